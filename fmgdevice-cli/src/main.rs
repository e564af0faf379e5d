use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;

use fmgdevice_core::schema::{FieldDescriptor, FieldKind};
use fmgdevice_core::{ConfigObject, Flattener, ResourceData, ResourceSchema, expand_object};
use fmgdevice_provider::{
    ProviderConfig, Resolution, all_schemas, builtin_patches, get_schema, resolve_path_params,
};

#[derive(Parser)]
#[command(name = "fmgdevice")]
#[command(about = "Inspect FortiManager device resource schemas and convert objects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported resource types
    Resources,
    /// Show the field table of a resource type
    Schema {
        /// Resource type (e.g., system_interface)
        resource_type: String,
    },
    /// Check every schema for naming conflicts
    Check,
    /// Convert a device JSON object into local state
    Flatten {
        resource_type: String,
        /// Path to the wire object (hyphenated keys)
        file: PathBuf,

        /// Print sensitive values instead of masking them
        #[arg(long)]
        show_sensitive: bool,
    },
    /// Convert local state into the device JSON object
    Expand {
        resource_type: String,
        /// Path to the local state (underscored keys)
        file: PathBuf,

        /// Print sensitive values instead of masking them
        #[arg(long)]
        show_sensitive: bool,
    },
    /// Resolve the path parameters for local state
    Params {
        resource_type: String,
        /// Path to the local state (underscored keys)
        file: PathBuf,

        /// Provider configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Also consult import options
        #[arg(long)]
        import: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resources => run_resources(),
        Commands::Schema { resource_type } => run_schema(&resource_type),
        Commands::Check => run_check(),
        Commands::Flatten {
            resource_type,
            file,
            show_sensitive,
        } => run_flatten(&resource_type, &file, show_sensitive),
        Commands::Expand {
            resource_type,
            file,
            show_sensitive,
        } => run_expand(&resource_type, &file, show_sensitive),
        Commands::Params {
            resource_type,
            file,
            config,
            import,
        } => run_params(&resource_type, &file, config.as_deref(), import),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_schema(resource_type: &str) -> Result<ResourceSchema> {
    get_schema(resource_type).ok_or_else(|| anyhow!("Unknown resource type: {}", resource_type))
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_state(resource_type: &str, path: &Path) -> Result<ResourceData> {
    let json = read_json(path)?;
    ResourceData::from_json(resource_type, &json)
        .with_context(|| format!("Failed to load {}", path.display()))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_resources() -> Result<()> {
    for schema in all_schemas() {
        let kind = if schema.is_singleton() {
            "singleton".dimmed()
        } else {
            "keyed".normal()
        };
        println!("{:<45} {}", schema.resource_type.bold(), kind);
    }
    Ok(())
}

fn run_schema(resource_type: &str) -> Result<()> {
    let schema = load_schema(resource_type)?;
    println!("{}", schema.resource_type.bold());
    if let Some(desc) = &schema.description {
        println!("  {}", desc.dimmed());
    }
    println!();
    print_fields(&schema.fields, 1);
    Ok(())
}

fn print_fields(fields: &[FieldDescriptor], depth: usize) {
    let indent = "  ".repeat(depth);
    for field in fields {
        let mut flags = Vec::new();
        if !field.access.optional {
            flags.push("required");
        }
        if field.access.computed {
            flags.push("computed");
        }
        if field.access.force_new {
            flags.push("force-new");
        }
        if field.access.sensitive {
            flags.push("sensitive");
        }

        let wire = match &field.path_param {
            Some(param) => format!("path:{}", param.wire_name).cyan(),
            None if field.is_irregular() => field.wire_key.yellow(),
            None => field.wire_key.normal(),
        };
        println!(
            "{}{:<30} {:<14} {:<24} {}",
            indent,
            field.name,
            field.kind.to_string(),
            wire,
            flags.join(",").dimmed()
        );

        if let FieldKind::Block(sub) | FieldKind::List(sub) = &field.kind {
            print_fields(sub, depth + 1);
        }
    }
}

fn run_check() -> Result<()> {
    let mut failures = 0;
    for schema in all_schemas() {
        match schema.check_naming() {
            Ok(()) => println!("{} {}", "✓".green(), schema.resource_type),
            Err(errors) => {
                failures += 1;
                println!("{} {}", "✗".red(), schema.resource_type);
                for error in errors {
                    println!("    {}", error);
                }
            }
        }
    }
    if failures > 0 {
        bail!("{} schema(s) failed the naming check", failures);
    }
    Ok(())
}

fn run_flatten(resource_type: &str, path: &Path, show_sensitive: bool) -> Result<()> {
    let schema = load_schema(resource_type)?;
    let object = ConfigObject::from_json(read_json(path)?)
        .ok_or_else(|| anyhow!("{}: expected a JSON object", path.display()))?;

    let patches = builtin_patches();
    let attributes = Flattener::new(&schema.resource_type, &patches)
        .flatten_object(&schema, &object)
        .with_context(|| format!("Failed to flatten {}", resource_type))?;

    let mut data = ResourceData::new(resource_type);
    for (name, value) in attributes {
        data.set(name, value);
    }

    let mut json = data.to_json();
    if !show_sensitive {
        mask_sensitive(&mut json, &schema.fields);
    }
    print_json(&json)
}

/// Mask sensitive values in local state JSON (underscored keys)
fn mask_sensitive(json: &mut serde_json::Value, fields: &[FieldDescriptor]) {
    match json {
        serde_json::Value::Object(map) => {
            for field in fields {
                let Some(value) = map.get_mut(&field.name) else {
                    continue;
                };
                if field.access.sensitive {
                    *value = serde_json::Value::String("<sensitive>".to_string());
                } else if let Some(sub) = field.sub_fields() {
                    mask_sensitive(value, sub);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                mask_sensitive(item, fields);
            }
        }
        _ => {}
    }
}

fn run_expand(resource_type: &str, path: &Path, show_sensitive: bool) -> Result<()> {
    let schema = load_schema(resource_type)?;
    let data = read_state(resource_type, path)?;
    if let Err(errors) = schema.validate(data.attributes()) {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("{}: {}", resource_type, messages.join("; "));
    }

    let object = expand_object(&schema, &data)
        .with_context(|| format!("Failed to expand {}", resource_type))?;
    let object = if show_sensitive {
        object
    } else {
        object.redacted(&schema)
    };
    print_json(&object.to_json())
}

fn run_params(
    resource_type: &str,
    path: &Path,
    config_path: Option<&Path>,
    import: bool,
) -> Result<()> {
    let schema = load_schema(resource_type)?;
    let data = read_state(resource_type, path)?;
    let config = match config_path {
        Some(p) => ProviderConfig::from_file(p)?,
        None => ProviderConfig::default(),
    }
    .with_env_overrides()?;

    let resolution = if import {
        Resolution::Read
    } else {
        Resolution::Write
    };
    let params = resolve_path_params(&schema, &data, &config, resolution)?;
    let json: serde_json::Map<String, serde_json::Value> = params
        .into_iter()
        .map(|(k, v)| (k, serde_json::Value::String(v)))
        .collect();
    print_json(&serde_json::Value::Object(json))
}
