pub mod dispatch;
pub mod run;
pub mod wait;

use dispatch_wait_core::{InputError, actions::ActionEnv};

/// Resolve an input flag-first, then from the Actions environment. Blank
/// values count as absent either way.
fn input<'a>(flag: &'a Option<String>, env: &'a ActionEnv, name: &str) -> Option<&'a str> {
    flag.as_deref().map(str::trim).filter(|value| !value.is_empty()).or_else(|| env.input(name))
}

fn required<'a>(
    flag: &'a Option<String>,
    env: &'a ActionEnv,
    name: &'static str,
) -> Result<&'a str, InputError> {
    input(flag, env, name).ok_or(InputError::Missing(name))
}

/// The credential input. Historically named `pat`, so both spellings work.
fn token<'a>(flag: &'a Option<String>, env: &'a ActionEnv) -> Result<&'a str, InputError> {
    input(flag, env, "token").or_else(|| env.input("pat")).ok_or(InputError::Missing("token"))
}

/// The correlation marker. Older variants call it `name` instead of `sha`.
fn marker<'a>(flag: &'a Option<String>, env: &'a ActionEnv) -> Result<&'a str, InputError> {
    input(flag, env, "sha").or_else(|| env.input("name")).ok_or(InputError::Missing("sha"))
}
