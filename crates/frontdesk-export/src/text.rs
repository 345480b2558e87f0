use tera::{Context, Tera};

use crate::error::ExportError;
use crate::styles::ExportStyles;
use crate::table::ReportTable;

const TEMPLATE_NAME: &str = "report.txt";

const PAGE_TEMPLATE: &str = "\
{{ title }}

{{ header }}
{% for line in lines %}{{ line }}
{% endfor %}
Page {{ page }} of {{ page_count }}
";

/// Pages are separated by a form feed.
pub const PAGE_BREAK: &str = "\u{000C}";

const COLUMN_SEPARATOR: &str = " | ";

/// Render the table as plain text pages. Each page repeats the title and the
/// `" | "`-joined header, holds at most `rows_per_page` rows and ends with a
/// `Page n of m` footer.
pub fn render_text(table: &ReportTable, styles: &ExportStyles) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, PAGE_TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let header = table.headers.join(COLUMN_SEPARATOR);
    let per_page = styles.rows_per_page.max(1);
    let pages: Vec<&[Vec<String>]> = table.rows.chunks(per_page).collect();
    let page_count = pages.len().max(1);

    let mut rendered = Vec::with_capacity(page_count);
    for page in 0..page_count {
        let lines: Vec<String> = pages
            .get(page)
            .map(|rows| rows.iter().map(|r| r.join(COLUMN_SEPARATOR)).collect())
            .unwrap_or_default();

        let mut context = Context::new();
        context.insert("title", &styles.title);
        context.insert("page", &(page + 1));
        context.insert("page_count", &page_count);
        context.insert("header", &header);
        context.insert("lines", &lines);

        rendered.push(tera.render(TEMPLATE_NAME, &context)?);
    }

    Ok(rendered.join(PAGE_BREAK))
}
