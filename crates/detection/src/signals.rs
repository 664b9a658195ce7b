/// Heuristic markers that a form rejected input, and the checks that find them
use scraper::{ElementRef, Html, Selector};

/// Class fragments that mark an input as error-styled
const ERROR_BORDER_MARKERS: [&str; 3] = ["border-destructive", "is-invalid", "input-error"];

/// Class fragments that mark an element as error-message copy
const ERROR_TEXT_MARKERS: [&str; 2] = ["text-destructive", "text-[var(--destructive)]"];

/// Words that show up in form rejection copy
const ERROR_VOCABULARY: [&str; 5] = ["required", "invalid", "match", "at least", "error"];

/// Sentinel when a message cannot be tied to a field
pub const UNKNOWN_FIELD: &str = "unknown";

/// Sentinel for inputs without a name attribute
const UNNAMED_FIELD: &str = "unnamed";

/// One DOM-observable marker that the form rejected input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationSignal {
    AriaInvalid { field: String },
    ErrorBorder { field: String },
    ErrorMessage { text: String, field: String },
}

/// Aggregated outcome of one validation scan; recomputed fresh per call,
/// never cached
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub found: bool,
    pub signals: Vec<ValidationSignal>,
}

impl ValidationResult {
    pub(crate) fn none() -> Self {
        Self::default()
    }

    /// Push preserving insertion order, suppressing duplicates: ARIA and
    /// border signals repeat by field (a border on a field already flagged
    /// ARIA-invalid adds nothing), messages repeat by text.
    pub(crate) fn push(&mut self, signal: ValidationSignal) {
        let duplicate = match &signal {
            ValidationSignal::AriaInvalid { field } => self.signals.iter().any(
                |s| matches!(s, ValidationSignal::AriaInvalid { field: f } if f == field),
            ),
            ValidationSignal::ErrorBorder { field } => self.signals.iter().any(|s| match s {
                ValidationSignal::AriaInvalid { field: f }
                | ValidationSignal::ErrorBorder { field: f } => f == field,
                _ => false,
            }),
            ValidationSignal::ErrorMessage { text, .. } => self.signals.iter().any(
                |s| matches!(s, ValidationSignal::ErrorMessage { text: t, .. } if t == text),
            ),
        };

        if !duplicate {
            self.found = true;
            self.signals.push(signal);
        }
    }
}

/// One independent predicate over a parsed snapshot. Checks run in a fixed
/// order and are composed by the detector; adding a signal kind is a pure
/// extension.
pub trait SignalCheck: Send + Sync {
    fn name(&self) -> &str;
    fn scan(&self, doc: &Html) -> Vec<ValidationSignal>;
}

/// Inputs flagged `aria-invalid="true"`
pub struct AriaInvalidCheck;

impl SignalCheck for AriaInvalidCheck {
    fn name(&self) -> &str {
        "aria_invalid"
    }

    fn scan(&self, doc: &Html) -> Vec<ValidationSignal> {
        let selector = Selector::parse(r#"input[aria-invalid="true"]"#).unwrap();

        doc.select(&selector)
            .map(|input| ValidationSignal::AriaInvalid {
                field: field_name(input),
            })
            .collect()
    }
}

/// Inputs whose class list carries an error marker
pub struct ErrorBorderCheck;

impl SignalCheck for ErrorBorderCheck {
    fn name(&self) -> &str {
        "error_border"
    }

    fn scan(&self, doc: &Html) -> Vec<ValidationSignal> {
        let selector = Selector::parse("input").unwrap();

        doc.select(&selector)
            .filter(|input| {
                let classes = input.value().attr("class").unwrap_or("");
                ERROR_BORDER_MARKERS.iter().any(|m| classes.contains(m))
            })
            .map(|input| ValidationSignal::ErrorBorder {
                field: field_name(input),
            })
            .collect()
    }
}

/// Visible error-message copy, found by destructive-text styling or by
/// rejection vocabulary in the element's own text
pub struct ErrorMessageCheck;

impl SignalCheck for ErrorMessageCheck {
    fn name(&self) -> &str {
        "error_message"
    }

    fn scan(&self, doc: &Html) -> Vec<ValidationSignal> {
        let mut signals = Vec::new();

        for element in doc.root_element().descendants().filter_map(ElementRef::wrap) {
            let tag = element.value().name();
            if tag == "script" || tag == "style" || tag == "input" {
                continue;
            }

            let text = element.text().collect::<String>().trim().to_string();
            if text.is_empty() {
                continue;
            }

            let classes = element.value().attr("class").unwrap_or("");
            let styled = ERROR_TEXT_MARKERS.iter().any(|m| classes.contains(m));
            // Vocabulary matches only against the element's own text nodes,
            // otherwise every ancestor of a message would fire too
            let worded = {
                let own = direct_text(element).to_lowercase();
                ERROR_VOCABULARY.iter().any(|w| own.contains(w))
            };

            if styled || worded {
                signals.push(ValidationSignal::ErrorMessage {
                    text,
                    field: associated_field(element)
                        .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                });
            }
        }

        signals
    }
}

fn field_name(input: ElementRef<'_>) -> String {
    input
        .value()
        .attr("name")
        .unwrap_or(UNNAMED_FIELD)
        .to_string()
}

/// Text directly inside the element, ignoring nested children
fn direct_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|t| t.trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Best-effort structural lookup: the message usually follows the field it
/// refers to, so walk preceding siblings of the element (then of each
/// ancestor, nearest first) for a named input.
fn associated_field(element: ElementRef<'_>) -> Option<String> {
    let named_input = Selector::parse("input[name]").unwrap();

    for node in std::iter::once(*element).chain(element.ancestors()) {
        for sibling in node.prev_siblings().filter_map(ElementRef::wrap) {
            // The sibling may itself be the input
            if sibling.value().name() == "input" {
                if let Some(name) = sibling.value().attr("name") {
                    return Some(name.to_string());
                }
            }

            if let Some(input) = sibling.select(&named_input).next() {
                if let Some(name) = input.value().attr("name") {
                    return Some(name.to_string());
                }
            }
        }
    }

    None
}
