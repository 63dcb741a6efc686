use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span};

use relaysig_cli::config::AppConfig;
use relaysig_comtrade::{ComtradeRecord, read_config};
use relaysig_map::{AliasStore, SignalValidator, Suggestion};
use relaysig_model::{AliasEntry, MatchTier, SignalKind, ValidationSummary, classify_signal_function};
use relaysig_standards::{CatalogFile, ComtradeTemplate, StandardCatalog, StandardSignal};
use relaysig_xrio::XrioExtractor;

use crate::cli::{AliasCommand, CatalogCommand, ComtradeArgs, ValidateArgs, XrioArgs};
use crate::summary::{print_aliases, print_catalog, print_comtrade, print_validation, print_xrio};

#[derive(Serialize)]
struct ValidationReport<'a> {
    model: &'a str,
    #[serde(flatten)]
    summary: &'a ValidationSummary,
    match_rate: f64,
    suggestions: &'a BTreeMap<String, Vec<Suggestion>>,
}

pub fn run_comtrade(args: &ComtradeArgs, json: bool) -> Result<()> {
    let span = info_span!("comtrade", path = %args.path.display());
    let _guard = span.enter();
    let (config, samples) = if args.samples {
        let record = ComtradeRecord::load(&args.path)
            .with_context(|| format!("load recording {}", args.path.display()))?;
        let count = record.samples.len();
        (record.config, Some(count))
    } else {
        let config = read_config(&args.path)
            .with_context(|| format!("read configuration {}", args.path.display()))?;
        (config, None)
    };
    if json {
        print_json(&config)
    } else {
        print_comtrade(&config, samples);
        Ok(())
    }
}

pub fn run_xrio(args: &XrioArgs, json: bool) -> Result<()> {
    let span = info_span!("xrio", path = %args.path.display());
    let _guard = span.enter();
    let extractor = XrioExtractor::open(&args.path)
        .with_context(|| format!("open XRIO export {}", args.path.display()))?;

    if args.blocks {
        let names = extractor.block_names();
        if json {
            return print_json(&names);
        }
        for name in names {
            println!("{name}");
        }
        return Ok(());
    }

    let data = extractor.extract();
    if let Some(block) = &args.raw {
        let Some(xml) = data.raw_blocks.get(&block.to_uppercase()) else {
            bail!("block {block} not found in {}", args.path.display());
        };
        println!("{xml}");
        return Ok(());
    }
    if json {
        print_json(&data)
    } else {
        print_xrio(&data);
        Ok(())
    }
}

pub fn run_validate(args: &ValidateArgs, settings: &AppConfig, json: bool) -> Result<()> {
    let span = info_span!("validate", xrio = %args.xrio.display());
    let _guard = span.enter();

    let data = XrioExtractor::open(&args.xrio)
        .with_context(|| format!("open XRIO export {}", args.xrio.display()))?
        .extract();
    let config = args
        .comtrade
        .as_deref()
        .map(|path| {
            read_config(path).with_context(|| format!("read configuration {}", path.display()))
        })
        .transpose()?;
    let file_catalog = load_catalog(settings)?;
    let catalog: &dyn StandardCatalog = match &file_catalog {
        Some(catalog) => catalog,
        None => &ComtradeTemplate,
    };
    let mut store = open_store(settings)?;
    let model = data.relay.model_key();

    let mut validator =
        SignalValidator::new(&mut store, catalog).with_normalizer(settings.normalizer());
    let summary = validator
        .summarize(&data, config.as_ref())
        .context("record learned aliases")?;

    let mut suggestions = BTreeMap::new();
    if args.suggest {
        let limit = args.limit.unwrap_or(settings.suggestion_limit);
        for result in summary
            .results
            .iter()
            .filter(|result| result.tier == MatchTier::New)
        {
            let candidates = validator.suggest(&result.source_name, model, result.kind, limit);
            if !candidates.is_empty() {
                suggestions.insert(result.source_name.clone(), candidates);
            }
        }
    }

    if json {
        print_json(&ValidationReport {
            model,
            summary: &summary,
            match_rate: summary.match_rate(),
            suggestions: &suggestions,
        })
    } else {
        print_validation(model, &summary, &suggestions);
        Ok(())
    }
}

pub fn run_alias(command: &AliasCommand, settings: &AppConfig, json: bool) -> Result<()> {
    let mut store = open_store(settings)?;
    match command {
        AliasCommand::List { model, function } => {
            let entries: Vec<&AliasEntry> = store
                .all()
                .filter(|entry| {
                    model
                        .as_deref()
                        .is_none_or(|model| entry.relay_model.eq_ignore_ascii_case(model))
                })
                .filter(|entry| {
                    function
                        .as_deref()
                        .is_none_or(|function| entry.function.eq_ignore_ascii_case(function))
                })
                .collect();
            show_aliases(&entries, json)
        }
        AliasCommand::Search { query } => show_aliases(&store.search(query), json),
        AliasCommand::Add {
            model,
            name,
            standard,
            kind,
            function,
        } => {
            let mut entry = AliasEntry::new(model, name, standard, SignalKind::from(*kind));
            entry.function = function
                .clone()
                .unwrap_or_else(|| classify_signal_function(name).as_str().to_string());
            entry.validated = true;
            let is_new = store.add(entry).context("save alias store")?;
            let verb = if is_new { "added" } else { "updated" };
            info!(model = %model, name = %name, standard = %standard, "alias {verb}");
            println!("{verb} {}", AliasEntry::key_for(model, name));
            Ok(())
        }
        AliasCommand::Remove { model, name } => {
            if !store.remove(model, name).context("save alias store")? {
                bail!("no alias {}", AliasEntry::key_for(model, name));
            }
            println!("removed {}", AliasEntry::key_for(model, name));
            Ok(())
        }
        AliasCommand::Import { path } => {
            let added = store
                .import_from(path)
                .with_context(|| format!("import aliases from {}", path.display()))?;
            println!("imported {added} new alias(es), {} total", store.len());
            Ok(())
        }
        AliasCommand::Export { path } => {
            store
                .export_to(path)
                .with_context(|| format!("export aliases to {}", path.display()))?;
            println!("exported {} alias(es) to {}", store.len(), path.display());
            Ok(())
        }
    }
}

pub fn run_catalog(command: &CatalogCommand, settings: &AppConfig, json: bool) -> Result<()> {
    match command {
        CatalogCommand::Show { model, kind } => {
            let kind = kind.map(SignalKind::from);
            let groups: Vec<(String, Vec<StandardSignal>)> = match model {
                Some(model) => {
                    let Some(catalog) = load_catalog(settings)? else {
                        bail!("--model needs a catalog file (--catalog or catalog_path)");
                    };
                    catalog.model_catalog(model).into_iter().collect()
                }
                None => ComtradeTemplate::by_category()
                    .into_iter()
                    .map(|(category, signals)| (category.label().to_string(), signals))
                    .collect(),
            };
            let groups: Vec<(String, Vec<StandardSignal>)> = groups
                .into_iter()
                .map(|(group, signals)| {
                    let signals = signals
                        .into_iter()
                        .filter(|signal| kind.is_none_or(|kind| signal.kind == kind))
                        .collect::<Vec<_>>();
                    (group, signals)
                })
                .filter(|(_, signals)| !signals.is_empty())
                .collect();
            if json {
                let grouped: BTreeMap<&str, &Vec<StandardSignal>> = groups
                    .iter()
                    .map(|(group, signals)| (group.as_str(), signals))
                    .collect();
                print_json(&grouped)
            } else {
                print_catalog(&groups);
                Ok(())
            }
        }
        CatalogCommand::Models => {
            let Some(catalog) = load_catalog(settings)? else {
                bail!("no catalog file configured (--catalog or catalog_path)");
            };
            let models = catalog.models();
            if json {
                return print_json(&models);
            }
            for model in models {
                println!("{model}");
            }
            Ok(())
        }
    }
}

fn open_store(settings: &AppConfig) -> Result<AliasStore> {
    AliasStore::open(&settings.store_path)
        .with_context(|| format!("open alias store {}", settings.store_path.display()))
}

fn load_catalog(settings: &AppConfig) -> Result<Option<CatalogFile>> {
    settings
        .catalog_path
        .as_deref()
        .map(|path| {
            CatalogFile::load(path).with_context(|| format!("load catalog {}", path.display()))
        })
        .transpose()
}

fn show_aliases(entries: &[&AliasEntry], json: bool) -> Result<()> {
    if json {
        print_json(&entries)
    } else {
        print_aliases(entries);
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
