//! The generic field-mapping parser.
//!
//! One parser interprets every jurisdiction: all jurisdiction quirks live in
//! the [`JurisdictionMapping`] data it is given.

use std::time::Instant;

use chrono::NaiveDate;
use cosreg_model::{CanonicalRecord, Jurisdiction, ProductType, Status, TableType};
use cosreg_normalize::{
    CasNumber, Concentration, Normalizer, SymbolTable, clean_inci_name, normalize_product_type,
    parse_cas_number, parse_date,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, info_span};

use crate::config::{CanonicalField, JurisdictionMapping, TableMapping};
use crate::document::{RawDocument, lookup, scalar_text};
use crate::error::{RowIssue, SourceReadError};
use crate::legal_basis::default_legal_basis;

/// Per-run row counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub rows_read: usize,
    pub rows_parsed: usize,
    pub rows_skipped: usize,
    pub records_emitted: usize,
}

impl ParseStats {
    pub fn merge(&mut self, other: &ParseStats) {
        self.rows_read += other.rows_read;
        self.rows_parsed += other.rows_parsed;
        self.rows_skipped += other.rows_skipped;
        self.records_emitted += other.records_emitted;
    }
}

/// A row-scoped problem, with the 1-based row number in the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDiagnostic {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    pub row: usize,
    pub issue: RowIssue,
}

impl RowDiagnostic {
    pub fn message(&self) -> String {
        format!(
            "{} {} row {}: {}",
            self.jurisdiction, self.table_type, self.row, self.issue
        )
    }
}

/// Records produced from one (jurisdiction, table type) source.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub jurisdiction: Jurisdiction,
    pub table_type: TableType,
    /// In source order; never sorted or deduplicated.
    pub records: Vec<CanonicalRecord>,
    pub stats: ParseStats,
    pub diagnostics: Vec<RowDiagnostic>,
    /// Snapshot version declared by the document, if any.
    pub version: Option<String>,
}

/// Parser bound to one jurisdiction's mapping.
#[derive(Debug, Clone)]
pub struct FieldMappingParser<'a> {
    mapping: &'a JurisdictionMapping,
    symbols: SymbolTable,
}

impl<'a> FieldMappingParser<'a> {
    pub fn new(mapping: &'a JurisdictionMapping) -> Self {
        Self {
            mapping,
            symbols: mapping.symbol_table(),
        }
    }

    pub fn jurisdiction(&self) -> Jurisdiction {
        self.mapping.jurisdiction
    }

    /// Parses one table of `document`. Unconfigured tables are read with
    /// the default mapping (canonical field names as source fields).
    pub fn parse(
        &self,
        document: &RawDocument,
        table_type: TableType,
    ) -> Result<ParseOutcome, SourceReadError> {
        let default_mapping = TableMapping::default();
        let table = self.mapping.table(table_type).unwrap_or(&default_mapping);
        parse_with_symbols(
            document,
            self.mapping.jurisdiction,
            table_type,
            table,
            &self.symbols,
        )
    }
}

/// Parses one table with the jurisdiction's built-in symbols.
pub fn parse(
    document: &RawDocument,
    jurisdiction: Jurisdiction,
    table_type: TableType,
    mapping: &TableMapping,
) -> Result<ParseOutcome, SourceReadError> {
    let symbols = SymbolTable::for_jurisdiction(jurisdiction);
    parse_with_symbols(document, jurisdiction, table_type, mapping, &symbols)
}

/// Parses one table of a raw document into canonical records.
///
/// Fails only when the row array cannot be located; every row-level problem
/// is reported in [`ParseOutcome::diagnostics`].
pub fn parse_with_symbols(
    document: &RawDocument,
    jurisdiction: Jurisdiction,
    table_type: TableType,
    mapping: &TableMapping,
    symbols: &SymbolTable,
) -> Result<ParseOutcome, SourceReadError> {
    let span = info_span!(
        "parse_table",
        jurisdiction = %jurisdiction,
        table_type = %table_type,
        origin = document.origin()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let rows = document.rows(mapping.records_path.as_deref(), table_type)?;
    let context = RowContext {
        jurisdiction,
        table_type,
        mapping,
        normalizer: Normalizer::new(jurisdiction)
            .with_symbols(symbols.clone())
            .with_default_unit(mapping.concentration_unit),
        document_date: document.published_date(),
    };

    let mut outcome = ParseOutcome {
        jurisdiction,
        table_type,
        records: Vec::new(),
        stats: ParseStats::default(),
        diagnostics: Vec::new(),
        version: document.version(),
    };

    for (idx, row) in rows.iter().enumerate() {
        outcome.stats.rows_read += 1;
        let row_number = idx + 1;
        let diagnostic = |issue| RowDiagnostic {
            jurisdiction,
            table_type,
            row: row_number,
            issue,
        };

        match context.parse_row(row) {
            Ok(parsed) => {
                outcome.stats.rows_parsed += 1;
                outcome.stats.records_emitted += parsed.records.len();
                outcome.records.extend(parsed.records);
                for issue in parsed.warnings {
                    debug!(row = row_number, %issue, "row flagged");
                    outcome.diagnostics.push(diagnostic(issue));
                }
            }
            Err(issue) => {
                outcome.stats.rows_skipped += 1;
                debug!(row = row_number, %issue, "row skipped");
                outcome.diagnostics.push(diagnostic(issue));
            }
        }
    }

    info!(
        rows_read = outcome.stats.rows_read,
        rows_parsed = outcome.stats.rows_parsed,
        rows_skipped = outcome.stats.rows_skipped,
        records = outcome.stats.records_emitted,
        duration_ms = start.elapsed().as_millis() as u64,
        "table parsed"
    );
    Ok(outcome)
}

struct ParsedRow {
    records: Vec<CanonicalRecord>,
    warnings: Vec<RowIssue>,
}

struct RowContext<'a> {
    jurisdiction: Jurisdiction,
    table_type: TableType,
    mapping: &'a TableMapping,
    normalizer: Normalizer,
    document_date: Option<NaiveDate>,
}

impl RowContext<'_> {
    /// First present, non-empty candidate value for a canonical field.
    fn field(&self, row: &Map<String, Value>, field: CanonicalField) -> Option<String> {
        self.mapping
            .candidates(field)
            .into_iter()
            .filter_map(|name| lookup(row, name))
            .find_map(scalar_text)
    }

    fn parse_row(&self, row: &Value) -> Result<ParsedRow, RowIssue> {
        let Value::Object(row) = row else {
            return Err(RowIssue::NotAnObject);
        };

        let inci_name = self
            .field(row, CanonicalField::InciName)
            .map(|name| clean_inci_name(&name))
            .filter(|name| !name.is_empty());
        let cas = self
            .field(row, CanonicalField::CasNo)
            .and_then(|raw| parse_cas_number(&raw));
        // A malformed CAS alone cannot identify the ingredient.
        if inci_name.is_none() && !cas.as_ref().is_some_and(CasNumber::is_well_formed) {
            return Err(RowIssue::MissingIdentity);
        }

        let mut warnings = Vec::new();
        let mut notes: Vec<String> = self.field(row, CanonicalField::Notes).into_iter().collect();
        if let Some(cas) = &cas {
            if let CasNumber::Malformed(raw) = cas {
                warnings.push(RowIssue::MalformedCas { value: raw.clone() });
            }
            notes.extend(cas.note());
        }

        let status = self
            .field(row, CanonicalField::Status)
            .and_then(|raw| raw.parse::<Status>().ok())
            .unwrap_or_else(|| self.mapping.status_for(self.table_type));

        let product_type = self
            .field(row, CanonicalField::ProductType)
            .and_then(|raw| normalize_product_type(&raw))
            .or(self.mapping.default_product_type);

        let mut base = CanonicalRecord::new(self.jurisdiction, self.table_type, status);
        base.inci_name = inci_name;
        base.cas_no = cas.map(CasNumber::into_string);
        base.product_type = product_type;
        base.conditions = self.field(row, CanonicalField::Conditions);
        base.legal_basis = self
            .field(row, CanonicalField::LegalBasis)
            .or_else(|| self.mapping.legal_basis.clone())
            .or_else(|| default_legal_basis(self.jurisdiction, self.table_type).map(str::to_string));
        base.update_date = self
            .field(row, CanonicalField::UpdateDate)
            .and_then(|raw| parse_date(&raw))
            .or(self.document_date);
        base.local_name = self.field(row, CanonicalField::LocalName);
        base.label_warnings = self.field(row, CanonicalField::LabelWarnings);
        base.colour_index = self.field(row, CanonicalField::ColourIndex);
        base.body_area = self.field(row, CanonicalField::BodyArea);
        base.list_name = self.field(row, CanonicalField::ListName);

        // Normalize every cell before emitting anything: one bad cell drops
        // the whole row.
        let cells = self.concentration_cells(row)?;

        let records = cells
            .into_iter()
            .filter(|(concentration, _)| concentration.is_none_or(|c| c.is_permitted()))
            .map(|(concentration, column_product_type)| {
                let mut record = base.clone();
                if column_product_type.is_some() {
                    record.product_type = column_product_type;
                }
                let mut record_notes = notes.clone();
                record_notes.extend(concentration.and_then(|c| c.note()).map(str::to_string));
                record.max_conc_percent = concentration.and_then(|c| c.value());
                if record.status == Status::Prohibited
                    && let Some(value) = record.max_conc_percent.take()
                {
                    record_notes.push(format!(
                        "Concentration {value}% ignored for prohibited entry"
                    ));
                }
                if !record_notes.is_empty() {
                    record.notes = Some(record_notes.join(" | "));
                }
                record
            })
            .collect();

        Ok(ParsedRow { records, warnings })
    }

    /// Concentration cells for the row, each with the product type it
    /// applies to when it comes from a matrix column. `None` means the row
    /// declares no concentration at all.
    fn concentration_cells(
        &self,
        row: &Map<String, Value>,
    ) -> Result<Vec<(Option<Concentration>, Option<ProductType>)>, RowIssue> {
        let unit = self.field(row, CanonicalField::ConcentrationUnit);

        if self.mapping.is_matrix() {
            return self
                .mapping
                .matrix
                .iter()
                .map(|column| -> Result<_, RowIssue> {
                    let raw = lookup(row, &column.source)
                        .and_then(scalar_text)
                        .unwrap_or_default();
                    let concentration = self.normalizer.normalize(&raw, unit.as_deref())?;
                    Ok((Some(concentration), Some(column.product_type)))
                })
                .collect();
        }

        let concentration = match self.field(row, CanonicalField::MaxConcPercent) {
            Some(raw) => Some(self.normalizer.normalize(&raw, unit.as_deref())?),
            None => None,
        };
        Ok(vec![(concentration, None)])
    }
}
