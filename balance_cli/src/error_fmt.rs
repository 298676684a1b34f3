//! Human-readable error descriptions and structured JSON error formatting.

use balance_core::error::{BalanceError, BuildError};

/// Stable machine-readable name for the error class.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingWorld => "MissingWorld",
            BuildError::InvalidConfig(_) => "InvalidConfig",
        };
    }
    if let Some(de) = err.downcast_ref::<BalanceError>() {
        return match de {
            BalanceError::Physics(_) => "Physics",
            BalanceError::Config(_) => "Config",
            BalanceError::State(_) => "State",
        };
    }
    "Error"
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingWorld => {
                "What happened: No physics world was provided to the balancer.\nLikely causes: The simulator failed to initialize or was not passed to the builder.\nHow to fix: Ensure the rig is created and passed via with_world(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line.\nHow to fix: Edit the config file or the override flags, then rerun."
            ),
        };
    }

    if let Some(de) = err.downcast_ref::<BalanceError>() {
        return match de {
            BalanceError::Physics(msg) => format!(
                "What happened: The physics simulation rejected a request ({msg}).\nLikely causes: A non-finite actuator command or inconsistent [sim] initial conditions.\nHow to fix: Check the [sim] and [controller] sections; rerun with --log-level=debug."
            ),
            BalanceError::State(msg) => format!(
                "What happened: The physics world refused to advance ({msg}).\nLikely causes: loop.time_scale or loop.tick_hz produced an invalid step.\nHow to fix: Use a finite, non-negative time scale and a positive tick rate."
            ),
            BalanceError::Config(msg) => describe_config(msg).unwrap_or_else(|| {
                format!(
                    "What happened: Invalid configuration ({msg}).\nLikely causes: A bad value in the config file or on the command line.\nHow to fix: Edit the config file or the flag, then rerun."
                )
            }),
        };
    }

    let msg = err.to_string();
    if let Some(text) = describe_config(&msg) {
        return text;
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Explanations for the config loader's read, parse and validation messages.
fn describe_config(msg: &str) -> Option<String> {
    let lower = msg.to_ascii_lowercase();
    if lower.starts_with("read config") {
        return Some(format!(
            "What happened: Could not read the config file.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Check the path and rerun. Original: {msg}"
        ));
    }
    if lower.starts_with("parse config") {
        return Some(format!(
            "What happened: The config file is not valid TOML for this program.\nLikely causes: A typo, a wrong value type, or an unknown controller.mode.\nHow to fix: Compare against the sections [loop], [sensor], [observer], [controller], [contact], [sim] and [logging]. Original: {msg}"
        ));
    }
    if lower.contains("must be") || lower.contains("unreasonably large") {
        return Some(format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file and try again."
        ));
    }
    None
}

/// Stable exit codes per error class; anything untyped returns 1.
///
/// 2 is left to clap for usage errors.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match reason_name(err) {
        "MissingWorld" | "InvalidConfig" | "Config" => 3,
        "Physics" => 4,
        "State" => 5,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "message": humanize(err),
        "chain": err.chain().map(|e| e.to_string()).collect::<Vec<_>>(),
    })
    .to_string()
}
