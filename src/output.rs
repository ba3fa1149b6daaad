//! Result serialization for the command line

use clap::ValueEnum;
use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::BytesText;
use serde::Serialize;
use thiserror::Error;

use crate::version::types::ResolutionResult;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML serialization failed: {0}")]
    Xml(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plain,
    Csv,
    Json,
    Toml,
    Xml,
    Yaml,
}

/// TOML has no null, so absent versions are left out of the table
#[derive(Serialize)]
struct TomlDocument<'a> {
    package: Vec<TomlPackage<'a>>,
}

#[derive(Serialize)]
struct TomlPackage<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

/// Renders resolved packages; the result ends with a newline unless empty
pub fn render(results: &[ResolutionResult], format: OutputFormat) -> Result<String, OutputError> {
    let rendered = match format {
        OutputFormat::Plain => render_plain(results),
        OutputFormat::Csv => render_csv(results),
        OutputFormat::Json => serde_json::to_string_pretty(results)? + "\n",
        OutputFormat::Toml => toml::to_string(&TomlDocument {
            package: results
                .iter()
                .map(|r| TomlPackage {
                    name: &r.package,
                    version: r.version.as_deref(),
                })
                .collect(),
        })?,
        OutputFormat::Xml => render_xml(results)?,
        OutputFormat::Yaml => serde_yaml::to_string(results)?,
    };
    Ok(rendered)
}

/// Renders a plain list of package names (for `list` and `missing`)
pub fn render_names(names: &[String], format: OutputFormat) -> Result<String, OutputError> {
    let results: Vec<ResolutionResult> = names
        .iter()
        .map(|name| ResolutionResult::new(name, None))
        .collect();
    match format {
        OutputFormat::Plain => Ok(names.iter().map(|name| format!("{}\n", name)).collect()),
        OutputFormat::Csv => Ok(std::iter::once("package\n".to_string())
            .chain(names.iter().map(|name| format!("{}\n", csv_field(name))))
            .collect()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(names)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(names)?),
        OutputFormat::Toml | OutputFormat::Xml => render(&results, format),
    }
}

/// Renders the catalog grouped by category, in priority order
pub fn render_categories(
    categories: &IndexMap<String, Vec<String>>,
    format: OutputFormat,
) -> Result<String, OutputError> {
    let rendered = match format {
        OutputFormat::Plain => categories
            .iter()
            .map(|(category, names)| format!("{}: {}\n", category, names.join(" ")))
            .collect(),
        OutputFormat::Csv => std::iter::once("category,package\n".to_string())
            .chain(categories.iter().flat_map(|(category, names)| {
                names
                    .iter()
                    .map(move |name| format!("{},{}\n", csv_field(category), csv_field(name)))
            }))
            .collect(),
        OutputFormat::Json => serde_json::to_string_pretty(categories)? + "\n",
        OutputFormat::Toml => toml::to_string(categories)?,
        OutputFormat::Xml => render_categories_xml(categories)?,
        OutputFormat::Yaml => serde_yaml::to_string(categories)?,
    };
    Ok(rendered)
}

fn render_plain(results: &[ResolutionResult]) -> String {
    let width = results.iter().map(|r| r.package.len()).max().unwrap_or(0);
    results
        .iter()
        .map(|r| match &r.version {
            Some(version) => format!("{:<width$} {}\n", r.package, version, width = width),
            None => format!("{}\n", r.package),
        })
        .collect()
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn render_csv(results: &[ResolutionResult]) -> String {
    std::iter::once("package,version\n".to_string())
        .chain(results.iter().map(|r| {
            format!(
                "{},{}\n",
                csv_field(&r.package),
                csv_field(r.version.as_deref().unwrap_or_default())
            )
        }))
        .collect()
}

fn render_xml(results: &[ResolutionResult]) -> Result<String, OutputError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .create_element("packages")
        .write_inner_content(|writer| {
            for result in results {
                let element = writer
                    .create_element("package")
                    .with_attribute(("name", result.package.as_str()));
                match &result.version {
                    Some(version) => element.write_text_content(BytesText::new(version))?,
                    None => element.write_empty()?,
                };
            }
            Ok::<(), std::io::Error>(())
        })?;

    let body = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n", body))
}

fn render_categories_xml(categories: &IndexMap<String, Vec<String>>) -> Result<String, OutputError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .create_element("categories")
        .write_inner_content(|writer| {
            for (category, names) in categories {
                writer
                    .create_element("category")
                    .with_attribute(("name", category.as_str()))
                    .write_inner_content(|writer| {
                        for name in names {
                            writer
                                .create_element("package")
                                .with_attribute(("name", name.as_str()))
                                .write_empty()?;
                        }
                        Ok::<(), std::io::Error>(())
                    })?;
            }
            Ok::<(), std::io::Error>(())
        })?;

    let body = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n", body))
}
