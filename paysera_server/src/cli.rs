use std::{env, env::VarError};

const README: &str = include_str!("./cli-help.txt");

/// Variables that are safe to print, grouped the way the help text describes them. `PAYSERA_SIGN_KEY` is a secret and
/// only ever reported as set or not set.
const ENV_GROUPS: [(&str, &[&str]); 5] = [
    ("Server", &["RUST_LOG", "PAYSERA_HOST", "PAYSERA_PORT", "PAYSERA_ORDERS_FILE"]),
    ("Merchant project", &[
        "PAYSERA_PROJECT_ID",
        "PAYSERA_DOMAIN_NAME",
        "PAYSERA_TEST_MODE",
        "PAYSERA_MESSAGE_TEXT",
    ]),
    ("Payment page", &["PAYSERA_API_VERSION", "PAYSERA_SERVICE_URL"]),
    ("Provider certificate", &[
        "PAYSERA_PUBLIC_KEY_URL",
        "PAYSERA_PUBLIC_KEY_TIMEOUT",
        "PAYSERA_PUBLIC_KEY_CACHE_TTL",
    ]),
    ("Buyer redirects", &["PAYSERA_ACCOUNT_URL", "PAYSERA_PRODUCTS_URL"]),
];

const SECRET_ENVS: [&str; 1] = ["PAYSERA_SIGN_KEY"];

/// The server takes no arguments. Passing any prints the help and the current configuration instead of starting.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        println!("\n{README}\n");
        println!("{}", describe_environment());
    }
    has_cli_args
}

fn describe_environment() -> String {
    let mut lines = vec!["Current configuration:".to_string()];
    for (group, names) in ENV_GROUPS {
        lines.push(format!("  {group}"));
        lines.extend(names.iter().map(|name| format!("    {name:<35} {}", env_value(name))));
    }
    lines.push("  Secrets".to_string());
    lines.extend(SECRET_ENVS.iter().map(|name| format!("    {name:<35} {}", secret_status(name))));
    lines.join("\n")
}

fn env_value(name: &str) -> String {
    match env::var(name) {
        Ok(s) => s,
        Err(VarError::NotPresent) => "Not set".into(),
        Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
    }
}

fn secret_status(name: &str) -> &'static str {
    match env::var(name) {
        Ok(s) if !s.trim().is_empty() => "Set (hidden)",
        Ok(_) => "Blank",
        Err(_) => "Not set",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn secrets_are_never_printed() {
        env::set_var("PAYSERA_SIGN_KEY", "hunter2-cli-test");
        env::set_var("PAYSERA_PROJECT_ID", "12");
        let description = describe_environment();
        assert!(!description.contains("hunter2-cli-test"));
        assert!(description.contains("Set (hidden)"));
        assert!(description.lines().any(|l| l.contains("PAYSERA_PROJECT_ID") && l.trim_end().ends_with("12")));
    }

    #[test]
    fn every_variable_is_listed_once() {
        let names =
            ENV_GROUPS.iter().flat_map(|(_, names)| names.iter()).chain(SECRET_ENVS.iter()).collect::<Vec<_>>();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), names.len());
        assert_eq!(names.len(), 16);
    }
}
