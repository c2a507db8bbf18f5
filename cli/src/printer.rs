use colored::Colorize;
use gcp_infra::{PlannedOutput, PlannedResource, PlannedValue};
use prettytable::{cell, format, row, Row, Table};
use serde::Serialize;

use anyhow::{anyhow, Context, Error, Result};
use std::{
    io::{self, Write},
    str::FromStr,
};

pub fn print_resources_as_json<Resource>(
    resources: impl IntoIterator<Item = Resource>,
    mut writer: impl Write,
) -> Result<()>
where
    Resource: Serialize,
{
    for resource in resources {
        serde_json::to_writer(&mut writer, &resource)
            .context("Could not serialise resource.")
            .and_then(|_| writeln!(writer).context("Failed to write JSON resource to writer."))?;
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        match string {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("unknown output format: '{}'", string)),
        }
    }
}

/// Represents a resource that is able to be displayed as a table.
///
/// The implementation must implement `to_table_headers` to return headers for the resource type,
/// and `to_table_row`, which should return a data row for the given resource instance.
pub trait DisplayTable {
    fn to_table_headers() -> Row;

    fn to_table_row(&self) -> Row;
}

fn display_value(value: &PlannedValue) -> String {
    let text = value.display();
    if value.value.is_some() {
        text.to_owned()
    } else {
        text.dimmed().to_string()
    }
}

impl DisplayTable for PlannedResource {
    fn to_table_headers() -> Row {
        row![bFg => "Key", "Type", "Project", "Depends On"]
    }

    fn to_table_row(&self) -> Row {
        let mut dependencies: Vec<String> = self
            .depends_on
            .iter()
            .map(|key| key.to_string())
            .collect();
        dependencies.extend(
            self.implicit_dependencies
                .iter()
                .map(|key| key.as_str().dimmed().to_string()),
        );
        row![
            self.key,
            self.type_token,
            match &self.project {
                Some(project) => project.as_str().normal(),
                None => "-".dimmed(),
            },
            dependencies.join("\n")
        ]
    }
}

impl DisplayTable for PlannedOutput {
    fn to_table_headers() -> Row {
        row![bFg => "Name", "Value"]
    }

    fn to_table_row(&self) -> Row {
        row![self.name, display_value(&self.value)]
    }
}

/// Helper trait to allow collection of resources to be converted into a table.
pub trait IntoTable {
    fn into_table(self) -> Table;
}

/// All iterators of resources can be converted into a table.
impl<'a, Iterable, Item: 'a> IntoTable for Iterable
where
    Iterable: IntoIterator<Item = &'a Item>,
    Item: DisplayTable,
{
    fn into_table(self) -> Table {
        let mut table = new_table();
        table.set_titles(Item::to_table_headers());
        for resource in self.into_iter() {
            table.add_row(resource.to_table_row());
        }
        table
    }
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    let format = format::FormatBuilder::new()
        .column_separator(' ')
        .borders(' ')
        .separators(&[], format::LineSeparator::new('-', '+', '+', '+'))
        .padding(0, 1)
        .build();
    table.set_format(format);
    table
}

/// Properties of a single planned resource, one per row.
pub fn properties_table(resource: &PlannedResource) -> Table {
    let mut table = new_table();
    table.set_titles(row![bFg => "Property", "Value"]);
    for property in &resource.properties {
        table.add_row(row![property.name, display_value(&property.value)]);
    }
    table
}

/// Print resources using the selected output format.
///
/// Resources passed to the printer must be able to be formatted using all supported
/// `OutputFormat`s.
#[derive(Default, Debug)]
pub struct Printer {
    output: OutputFormat,
}

impl Printer {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }

    pub fn format(&self) -> OutputFormat {
        self.output
    }

    pub fn print_resources<T, Resource>(&self, resources: T) -> Result<()>
    where
        T: IntoIterator<Item = Resource> + IntoTable,
        Resource: Serialize,
    {
        match self.output {
            OutputFormat::Table => resources.into_table().printstd(),
            OutputFormat::Json => print_resources_as_json(resources, io::stdout().lock())?,
        };
        Ok(())
    }
}
