use crate::cli::Command;
use ancestry_dna::config::Config;
use ancestry_dna::dna_api::{DnaClient, FilterSet, GroupAction, Transport};
use ancestry_dna::error::AppError;
use serde_json::Value;

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Parses repeated `--filter NAME=VALUE` arguments.
///
/// Names are checked later by the client, only the shape is checked here.
pub fn parse_filters(raw: &[String]) -> Result<FilterSet, AppError> {
    raw.iter()
        .map(|arg| match arg.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(AppError::config_error(format!(
                "Invalid filter '{arg}', expected NAME=VALUE"
            ))),
        })
        .collect()
}

/// Runs one subcommand and returns the service's JSON answer.
pub async fn run_command<T: Transport>(
    client: &mut DnaClient<T>,
    command: Command,
) -> Result<Value, AppError> {
    match command {
        Command::Tests { category } => Ok(Value::Array(client.get_tests(&category).await?)),
        Command::Admixture { test, compare } => {
            client.use_test(test.test);
            client.get_admixture(compare.as_deref()).await
        }
        Command::Matches {
            test,
            sort,
            filters,
            shared,
        } => {
            let filters = parse_filters(&filters)?;
            client.use_test(test.test);
            let groups = client
                .get_dna_matches(&sort, &filters, shared.as_deref())
                .await?;
            Ok(serde_json::to_value(groups)?)
        }
        Command::Ancestors { test, match_id } => {
            client.use_test(test.test);
            client.get_common_ancestors(&match_id).await
        }
        Command::Tree { test, match_id } => {
            client.use_test(test.test);
            client.get_tree_data(&match_id).await
        }
        Command::Groups { test } => {
            client.use_test(test.test);
            client.get_custom_groups().await
        }
        Command::CreateGroup { test, name, color } => {
            client.use_test(test.test);
            client.create_custom_group(&name, &color).await
        }
        Command::DeleteGroup { test, group } => {
            client.use_test(test.test);
            client.delete_custom_group(&group).await
        }
        Command::GroupMember {
            test,
            action,
            group,
            match_id,
        } => {
            let action: GroupAction = action.parse()?;
            client.use_test(test.test);
            client
                .modify_group_membership(action, &group, &match_id)
                .await
        }
        Command::Star {
            test,
            match_id,
            unstar,
        } => {
            client.use_test(test.test);
            client.set_starred(&match_id, !unstar).await
        }
    }
}

/// Prints a JSON value to stdout in indented form.
pub fn print_json(value: &Value) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
