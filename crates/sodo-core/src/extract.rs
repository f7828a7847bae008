use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::{Field, LandRecord, PersonRecord};

/// Where capture of a free-text field value ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopRule {
    /// Stop at the first period. Only safe for fields known to end a
    /// sentence; addresses and names legitimately contain periods.
    Sentence,
    /// Stop where any of the listed labels starts a subsequent line.
    /// Handles values that span multiple lines.
    Labels(Vec<String>),
    /// Capture everything to the end of the text.
    EndOfText,
}

/// How the value after a field label is captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueShape {
    /// A bare digit run, e.g. a parcel or map-sheet number.
    Digits,
    /// A decimal number with an optional unit suffix, e.g. an area in m².
    Decimal { unit: Option<String> },
    /// Free text up to a stop condition.
    Text { stop: StopRule },
}

impl std::fmt::Display for ValueShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Digits => f.write_str("digits"),
            Self::Decimal { unit: Some(unit) } => write!(f, "number ({unit})"),
            Self::Decimal { unit: None } => f.write_str("number"),
            Self::Text {
                stop: StopRule::Sentence,
            } => f.write_str("text until '.'"),
            Self::Text {
                stop: StopRule::Labels(labels),
            } => write!(f, "text until label: {}", labels.join(" | ")),
            Self::Text {
                stop: StopRule::EndOfText,
            } => f.write_str("text until end"),
        }
    }
}

/// One entry of the extraction catalog: which record field, the literal
/// label anchoring it in the document, and the capture shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: Field,
    pub label: String,
    pub shape: ValueShape,
}

impl FieldRule {
    #[must_use]
    pub fn digits(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            shape: ValueShape::Digits,
        }
    }

    #[must_use]
    pub fn decimal(field: Field, label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            shape: ValueShape::Decimal {
                unit: Some(unit.into()),
            },
        }
    }

    #[must_use]
    pub fn sentence(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
            shape: ValueShape::Text {
                stop: StopRule::Sentence,
            },
        }
    }

    #[must_use]
    pub fn until_labels<S: Into<String>>(
        field: Field,
        label: impl Into<String>,
        stops: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            field,
            label: label.into(),
            shape: ValueShape::Text {
                stop: StopRule::Labels(stops.into_iter().map(Into::into).collect()),
            },
        }
    }
}

/// Repeated land-user entries: a title marker, a name up to the next
/// comma, an ID label with a digit run, and an optional address up to
/// a terminating period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRule {
    pub titles: Vec<String>,
    pub id_label: String,
    pub address_label: String,
}

impl Default for PersonRule {
    fn default() -> Self {
        Self {
            titles: vec!["Ông".into(), "Bà".into()],
            id_label: "CCCD số".into(),
            address_label: "Địa chỉ".into(),
        }
    }
}

/// The certificate issue number sits near a branch-office marker, not
/// behind a label of its own: find the anchor, then look for a
/// two-letters-plus-digits token within a bounded window after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueNoRule {
    pub anchor: String,
    /// Window length in characters, counted after the anchor.
    pub window: usize,
    pub token: String,
}

impl Default for IssueNoRule {
    fn default() -> Self {
        Self {
            anchor: "CHI NHÁNH".into(),
            window: 300,
            token: r"[A-Z]{2}\s*\d{6,}".into(),
        }
    }
}

/// Full extractor configuration: the field catalog plus the person,
/// issue-number, and value-cleanup rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub fields: Vec<FieldRule>,
    pub person: PersonRule,
    pub issue_no: IssueNoRule,
    /// Delete-what-matches patterns applied to every captured value.
    /// These are repairs for observed OCR tail noise, not general rules;
    /// callers with different corpora should supply their own.
    pub cleanup: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldRule::digits(Field::ParcelNo, "Thửa đất số"),
                FieldRule::digits(Field::MapSheetNo, "Tờ bản đồ số"),
                FieldRule::decimal(Field::Area, "Diện tích", "m²"),
                FieldRule::sentence(Field::LandType, "Loại đất"),
                FieldRule::until_labels(
                    Field::UsageForm,
                    "Hình thức sử dụng đất",
                    ["Địa chỉ", "Thời hạn"],
                ),
                FieldRule::until_labels(
                    Field::Address,
                    "Địa chỉ",
                    ["Thời hạn", "Nguồn gốc", "Tên tài sản"],
                ),
                FieldRule::sentence(Field::UsageTerm, "Thời hạn"),
                FieldRule::until_labels(
                    Field::Origin,
                    "Nguồn gốc sử dụng",
                    ["Thời điểm đăng ký", "Số vào sổ"],
                ),
                FieldRule::until_labels(
                    Field::RegisteredAt,
                    "Thời điểm đăng ký vào sổ địa chính",
                    ["Số vào sổ", "Ghi chú"],
                ),
                FieldRule::until_labels(
                    Field::BookNo,
                    "Số vào sổ cấp Giấy chứng nhận",
                    ["Ghi chú", "Chi nhánh"],
                ),
                FieldRule::sentence(Field::Notes, "Ghi chú"),
            ],
            person: PersonRule::default(),
            issue_no: IssueNoRule::default(),
            cleanup: vec![
                r#"["”'›»]+$"#.into(),
                r"[\s;:,-]+$".into(),
                r"^[\s;:]+".into(),
            ],
        }
    }
}

/// The compiled extractor. Construction compiles every pattern once and
/// is the only fallible step; extraction itself never fails. A missing
/// field is an empty string, a malformed document yields a record of
/// empty strings.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    fields: Vec<(Field, Regex)>,
    person: Regex,
    issue_anchor: Regex,
    issue_token: Regex,
    issue_window: usize,
    date: Regex,
    cleanup: Vec<Regex>,
}

impl FieldExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let mut fields = Vec::with_capacity(config.fields.len());
        for rule in &config.fields {
            fields.push((rule.field, Self::compile_rule(rule)?));
        }

        let titles = config
            .person
            .titles
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let person = Regex::new(&format!(
            r"(?:{titles}):\s*([^\n,]+?),\s*{id}:\s*(\d+)(?:,\s*{addr}:\s*((?s:.*?)))?\.",
            id = regex::escape(&config.person.id_label),
            addr = regex::escape(&config.person.address_label),
        ))?;

        let issue_anchor = Regex::new(&format!("(?i){}", regex::escape(&config.issue_no.anchor)))?;
        let issue_token = Regex::new(&format!(r"\b({})\b", config.issue_no.token))?;

        let date = Regex::new(r"(?i)ngày\s*(\d{1,2})\s*tháng\s*(\d{1,2})\s*năm\s*(\d{4})")?;

        let mut cleanup = Vec::with_capacity(config.cleanup.len());
        for pattern in &config.cleanup {
            cleanup.push(Regex::new(pattern)?);
        }

        tracing::debug!(
            "Compiled {} field rules and {} cleanup rules",
            fields.len(),
            cleanup.len()
        );

        Ok(Self {
            fields,
            person,
            issue_anchor,
            issue_token,
            issue_window: config.issue_no.window,
            date,
            cleanup,
        })
    }

    /// One regex per catalog entry. Labels match case-insensitively with
    /// optional `:` or `-` after them; the stop boundary is consumed but
    /// not captured, which is equivalent to a lookahead here because each
    /// field is searched independently over the full text.
    fn compile_rule(rule: &FieldRule) -> Result<Regex> {
        if rule.label.is_empty() {
            return Err(Error::EmptyLabel(rule.field));
        }
        let label = regex::escape(&rule.label);

        let source = match &rule.shape {
            ValueShape::Digits => format!(r"(?i){label}\s*[:\-]?\s*(\d+)"),
            ValueShape::Decimal { unit } => unit.as_ref().map_or_else(
                || format!(r"(?i){label}\s*[:\-]?\s*([\d.,]+)"),
                |unit| {
                    format!(
                        r"(?i){label}\s*[:\-]?\s*([\d.,]+)\s*(?:{})?",
                        regex::escape(unit)
                    )
                },
            ),
            ValueShape::Text { stop } => match stop {
                StopRule::Sentence => {
                    format!(r"(?i){label}\s*[:\-]?\s*((?s:.*?))\s*(?:\.|$)")
                }
                StopRule::Labels(stops) if !stops.is_empty() => {
                    let alts = stops
                        .iter()
                        .map(|s| regex::escape(s))
                        .collect::<Vec<_>>()
                        .join("|");
                    format!(r"(?i){label}\s*[:\-]?\s*((?s:.*?))\s*(?:\n\s*(?:{alts})\s*[:\-]?|$)")
                }
                StopRule::Labels(_) | StopRule::EndOfText => {
                    format!(r"(?i){label}\s*[:\-]?\s*((?s:.*))")
                }
            },
        };

        Ok(Regex::new(&source)?)
    }

    /// Runs the whole catalog against normalized text. Idempotent and
    /// total: any input, including empty text, yields a fully-populated
    /// (possibly all-empty) record.
    #[must_use]
    pub fn extract(&self, text: &str) -> Extraction {
        let mut record = LandRecord::default();
        for (field, pattern) in &self.fields {
            let value = pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map_or_else(String::new, |m| self.clean(m.as_str()));
            tracing::debug!(
                "Field {}: {}",
                field,
                if value.is_empty() { "miss" } else { "hit" }
            );
            record.set(*field, value);
        }
        record.issue_no = self.issue_no(text);
        record.issued_at = self.issue_date(text);

        let persons = self.persons(text);

        Extraction { record, persons }
    }

    /// All land-user entries, in order of first appearance.
    #[must_use]
    pub fn persons(&self, text: &str) -> Vec<PersonRecord> {
        self.person
            .captures_iter(text)
            .map(|caps| {
                PersonRecord::new(
                    caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
                    caps.get(2).map_or("", |m| m.as_str()).trim().to_string(),
                    caps.get(3).map_or("", |m| m.as_str()).trim().to_string(),
                )
            })
            .collect()
    }

    /// The signature date sits at the document tail, so the last
    /// "ngày D tháng M năm YYYY" phrase wins. Calendar-invalid phrases
    /// are treated as not found.
    #[must_use]
    pub fn issue_date(&self, text: &str) -> String {
        self.date
            .captures_iter(text)
            .last()
            .and_then(|caps| {
                let day: u32 = caps.get(1)?.as_str().parse().ok()?;
                let month: u32 = caps.get(2)?.as_str().parse().ok()?;
                let year: i32 = caps.get(3)?.as_str().parse().ok()?;
                let date = chrono::NaiveDate::from_ymd_opt(year, month, day)?;
                Some(date.format("%d/%m/%Y").to_string())
            })
            .unwrap_or_default()
    }

    /// Issue-number token within the bounded window after the anchor.
    /// Absence of either yields an empty string.
    #[must_use]
    pub fn issue_no(&self, text: &str) -> String {
        let Some(anchor) = self.issue_anchor.find(text) else {
            return String::new();
        };
        // The window budget covers characters after the anchor; the
        // anchor text itself does not count against it.
        let end = text[anchor.end()..]
            .char_indices()
            .nth(self.issue_window)
            .map_or(text.len(), |(offset, _)| anchor.end() + offset);

        self.issue_token
            .captures(&text[anchor.start()..end])
            .and_then(|caps| caps.get(1))
            .map_or_else(String::new, |m| m.as_str().trim().to_string())
    }

    fn clean(&self, value: &str) -> String {
        let mut value = value.trim().to_string();
        for pattern in &self.cleanup {
            value = pattern.replace_all(&value, "").into_owned();
        }
        value.trim().to_string()
    }
}

/// Extractor output for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub record: LandRecord,
    pub persons: Vec<PersonRecord>,
}

impl Extraction {
    /// Flattens the record and person entries into the placeholder map
    /// consumed by the external document-template renderer. Person keys
    /// are numbered from 1 in order of appearance.
    #[must_use]
    pub fn template_context(&self) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        for field in Field::ALL {
            context.insert(
                field.context_key().to_string(),
                self.record.get(field).to_string(),
            );
        }
        for (i, person) in self.persons.iter().enumerate() {
            let n = i + 1;
            context.insert(format!("TenNguoi_{n}"), person.name.clone());
            context.insert(format!("SoCCCD_{n}"), person.id_no.clone());
            context.insert(format!("DiaChiNguoi_{n}"), person.address.clone());
        }
        context
    }
}
