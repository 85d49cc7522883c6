use anyhow::{Context, Result};
use filerenamer_core::{
    BatchRequest, CaseSetting, Config, DateRule, EnumerateOptions, NameSource, ReservedCharset,
    Rule,
};
use std::fs;
use std::io;

use crate::cli::args::{BatchArgs, NameArgs, RuleArgs};

/// Global settings that apply to every batch
#[derive(Debug, Clone, Copy)]
pub struct NamingOverrides {
    pub case: Option<CaseSetting>,
    pub charset: Option<ReservedCharset>,
}

/// Turn parsed arguments into a batch request, filling gaps from the config
pub fn build_request(
    args: BatchArgs,
    overrides: NamingOverrides,
    config: &Config,
) -> Result<BatchRequest> {
    let names = name_source(&args.names, config)?;
    let rules = rules_from_args(args.rules);

    Ok(BatchRequest {
        inputs: args.paths,
        enumerate: EnumerateOptions {
            recursive: args.recursive || config.defaults.recursive,
            name_filter: args.filter,
        },
        names,
        rules,
        case: overrides
            .case
            .unwrap_or(config.defaults.case_sensitivity),
        charset: overrides.charset,
    })
}

fn name_source(args: &NameArgs, config: &Config) -> Result<NameSource> {
    if let Some(source) = &args.names {
        let text = if source == "-" {
            io::read_to_string(io::stdin()).context("Failed to read names from stdin")?
        } else {
            fs::read_to_string(source)
                .with_context(|| format!("Failed to read names from {}", source))?
        };
        return Ok(NameSource::Text(text));
    }

    if let Some(format) = &args.date_format {
        let format = if format.is_empty() {
            config.defaults.date_format.clone()
        } else {
            format.clone()
        };
        return Ok(NameSource::CreationDate(DateRule {
            format,
            prefix: args.date_prefix.clone(),
            suffix: args.date_suffix.clone(),
        }));
    }

    Ok(NameSource::Originals)
}

fn rules_from_args(args: RuleArgs) -> Vec<Rule> {
    let mut rules = Vec::new();

    if let Some(find) = args.find {
        rules.push(Rule::Replace {
            find,
            replace: args.replace_with,
            case_sensitive: !args.ignore_case,
        });
    }

    if let Some(text) = args.insert {
        rules.push(Rule::Insert {
            text,
            position: args.at,
        });
    }

    if args.sequence {
        rules.push(Rule::Sequence {
            start: args.seq_start,
            pad: args.seq_pad,
            prefix: args.seq_prefix,
            suffix: args.seq_suffix,
            position: args.seq_at,
        });
    }

    rules
}
