use colored::*;
use std::{fs, path::Path};

use crate::context::Context;
use docr::config::{CACHE_ENV, Config, LIBRARY_ENV, TEMPLATE};
use docr::{DocrError, Result, log};

/// Print the environment, or a single value when `name` is given
pub fn show_env(ctx: &Context, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        match ctx.config.env_value(name) {
            Some(path) => println!("{}", path.display()),
            None => log::warn(format!("unknown environment value: {}", name)),
        }
        return Ok(());
    }

    for (key, path) in [
        (CACHE_ENV, &ctx.config.cache_dir),
        (LIBRARY_ENV, &ctx.config.library_dir),
    ] {
        let warn = if path.exists() {
            String::new()
        } else {
            format!(" {}", "(!)".yellow())
        };
        println!("{}={}{}", key, path.display(), warn);
    }

    if log::is_verbose() {
        let config_path = Config::path();
        let marker = if config_path.exists() { "" } else { " (not found)" };
        println!("{}", format!("config: {}{}", config_path.display(), marker).dimmed());
    }

    Ok(())
}

/// Create the cache and library directories and write a config template
pub fn init_env(ctx: &Context, force: bool) -> Result<()> {
    ctx.config.ensure_dirs()?;
    println!(
        "{} {}",
        "✅".green(),
        format!("{}={}", CACHE_ENV, ctx.config.cache_dir.display())
    );
    println!(
        "{} {}",
        "✅".green(),
        format!("{}={}", LIBRARY_ENV, ctx.config.library_dir.display())
    );

    write_template(&Config::path(), force)
}

fn write_template(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        log::info(format!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        ));
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DocrError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(config_path, TEMPLATE).map_err(|e| DocrError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    println!("{} Created {}", "✅".green(), config_path.display());
    println!("\n{}", "Edit it to add documentation sources or change the toolchain.".cyan());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_template_respects_force() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("docr.toml");

        write_template(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);

        fs::write(&path, "toolchain = \"crystal-dev\"\n").unwrap();
        write_template(&path, false).unwrap();
        assert!(
            fs::read_to_string(&path).unwrap().contains("crystal-dev"),
            "existing config is kept without --force"
        );

        write_template(&path, true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), TEMPLATE);
    }
}
