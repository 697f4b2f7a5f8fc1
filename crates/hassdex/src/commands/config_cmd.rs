//! Config subcommand handlers.

use std::fmt::Write;
use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

use super::Ctx;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` safe to print: plaintext tokens are masked.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let mut p = p.clone();
                if p.token.is_some() {
                    p.token = Some(MASK.into());
                }
                (name.clone(), p)
            })
            .collect(),
    }
}

/// Format config for display. Expects an already redacted config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = write!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out, "\n");
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = write!(out, "hub_url = \"{}\"", p.hub_url);
        if let Some(ref token) = p.token {
            let _ = write!(out, "\ntoken = \"{token}\"");
        }
        if let Some(ref env) = p.token_env {
            let _ = write!(out, "\ntoken_env = \"{env}\"");
        }
        for (key, path) in [
            ("token_file", &p.token_file),
            ("index_path", &p.index_path),
            ("previous_index_path", &p.previous_index_path),
            ("ca_cert", &p.ca_cert),
        ] {
            if let Some(path) = path {
                let _ = write!(out, "\n{key} = \"{}\"", path.display());
            }
        }
        if let Some(insecure) = p.insecure {
            let _ = write!(out, "\ninsecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = write!(out, "\ntimeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_token() -> Result<String, CliError> {
    let token = rpassword::prompt_password("Long-lived access token: ").map_err(prompt_err)?;
    let token = token.trim().to_owned();
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "access token cannot be empty".into(),
        });
    }
    Ok(token)
}

fn store_in_keyring(profile_name: &str, token: &str) -> Result<(), CliError> {
    let entry = config::keyring_entry(profile_name).map_err(|e| CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to access keyring: {e}"),
    })?;
    entry.set_password(token).map_err(|e| CliError::Validation {
        field: "keyring".into(),
        reason: format!("failed to store token in keyring: {e}"),
    })
}

/// Where the token ends up, as recorded in the profile.
struct TokenPlacement {
    token: Option<String>,
    token_file: Option<PathBuf>,
}

fn prompt_token_storage(profile_name: &str) -> Result<TokenPlacement, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Read from a file",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where should the access token live?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    match selection {
        0 => {
            store_in_keyring(profile_name, &prompt_token()?)?;
            eprintln!("   ✓ Token stored in system keyring");
            Ok(TokenPlacement {
                token: None,
                token_file: None,
            })
        }
        1 => {
            let path: String = Input::new()
                .with_prompt("Token file path")
                .interact_text()
                .map_err(prompt_err)?;
            Ok(TokenPlacement {
                token: None,
                token_file: Some(PathBuf::from(path)),
            })
        }
        _ => Ok(TokenPlacement {
            token: Some(prompt_token()?),
            token_file: None,
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, ctx: &Ctx) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("hassdex configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let hub_url: String = Input::new()
                .with_prompt("Hub URL")
                .default("http://homeassistant.local:8123".into())
                .validate_with(|s: &String| {
                    hassdex_config::parse_hub_url(s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let placement = prompt_token_storage(&profile_name)?;

            let insecure = Confirm::new()
                .with_prompt("Accept self-signed TLS certificates?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let index: String = Input::new()
                .with_prompt("Snapshot file")
                .default(hassdex_config::default_index_path().display().to_string())
                .interact_text()
                .map_err(prompt_err)?;

            let profile = Profile {
                hub_url,
                token: placement.token,
                token_file: placement.token_file,
                index_path: Some(PathBuf::from(index)),
                insecure: insecure.then_some(true),
                ..Profile::default()
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile_name.clone());
            }
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Profile: {profile_name}");
            eprintln!("\n  Try it: hassdex index --dry-run");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&ctx.config);
            let out = output::render_single(ctx.format, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), ctx.quiet);
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let profile_name =
                profile.unwrap_or_else(|| config::active_profile_name(global, &ctx.config));
            let token = prompt_token()?;
            store_in_keyring(&profile_name, &token)?;
            eprintln!("✓ Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
