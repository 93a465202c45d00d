use super::Reducer;
use crate::error::{PipelineError, PipelineResult};
use crate::record::{Key, OutputRecord, Value};
use crate::shuffle::GroupingMode;

pub const KML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n\
<Document>\n";

pub const KML_FOOTER: &str = "</Document>\n</kml>";

/// Concatenates all markup fragments, in input order and one per line,
/// inside a KML document and emits `(null, document)`.
///
/// An empty input still yields a well-formed document with no placemarks.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkupAssembler;

impl MarkupAssembler {
    pub fn assemble<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
        let mut doc = String::from(KML_HEADER);
        for fragment in fragments {
            doc.push_str(fragment);
            doc.push('\n');
        }
        doc.push_str(KML_FOOTER);
        doc
    }
}

impl Reducer for MarkupAssembler {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn grouping(&self) -> GroupingMode {
        GroupingMode::Single
    }

    fn reduce(
        &self,
        key: &Key,
        values: Vec<Value>,
        out: &mut dyn FnMut(OutputRecord),
    ) -> PipelineResult<()> {
        if let Some(bad) = values.iter().find(|v| v.as_text().is_none()) {
            return Err(PipelineError::Reduce {
                stage: self.name(),
                key: key.to_string(),
                reason: format!("expected a text fragment, found {}", bad.kind()),
            });
        }
        let doc = Self::assemble(values.iter().filter_map(Value::as_text));
        out(OutputRecord::new(Key::Null, Value::Text(doc)));
        Ok(())
    }
}
