use tera::{Context, Tera};
use tracing::debug;

use crate::error::ExportError;
use crate::note::{NoteInput, NoteView};

pub const HANDOFF_TEMPLATE_NAME: &str = "handoff.txt";
const HANDOFF_TEMPLATE: &str = include_str!("../templates/handoff.txt.tera");

/// Render the handoff note with the built-in template.
pub fn render_note(input: &NoteInput<'_>) -> Result<String, ExportError> {
    render_with(HANDOFF_TEMPLATE_NAME, HANDOFF_TEMPLATE, input)
}

/// Render the note with a caller-supplied template (Jinja2 syntax).
/// The [`NoteView`] fields become the template context variables.
pub fn render_with(
    template_name: &str,
    template_content: &str,
    input: &NoteInput<'_>,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let view = NoteView::build(input);
    let value = serde_json::to_value(&view)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(template_name, &context)?;
    debug!(bytes = rendered.len(), "handoff note rendered");
    Ok(rendered)
}
