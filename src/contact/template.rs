//! HTML email bodies for contact requests.

use super::request::{ContactRequest, HoloboxRequest, WorkshopBooking};

/// Values shared by every email besides the request itself.
#[derive(Debug, Clone)]
pub struct EmailContext<'a> {
    pub company_name: &'a str,
    /// Signed logo URL; `None` omits the logo block.
    pub logo_url: Option<&'a str>,
    /// Year shown in the copyright footer.
    pub year: i32,
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the email body for `request`.
pub fn render(request: &ContactRequest, ctx: &EmailContext<'_>) -> String {
    let subject = request.subject();
    let (sections, origin) = match request {
        ContactRequest::Holobox(holobox) => (holobox_sections(holobox), "request"),
        ContactRequest::Workshop(booking) => (workshop_sections(booking), "workshop booking request"),
    };
    let company = escape_html(ctx.company_name);

    let logo = ctx
        .logo_url
        .map(|url| {
            format!(
                r#"<div style="text-align: center; margin-bottom: 20px;">
                <img src="{}" alt="Logo" style="max-width: 100px;">
            </div>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{subject}</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <main>
            {logo}
            <h2 style="text-align: center; color: #1e293b;">{subject}</h2>
            {sections}
            <p style="color: #64748b; font-size: 14px; margin-top: 30px;">
                This {origin} was submitted via the {company} website.
            </p>
        </main>
        <footer style="text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #e2e8f0; font-size: 0.9em; color: #64748b;">
            <p>&copy; {year} {company}. All rights reserved.</p>
        </footer>
    </div>
</body>
</html>
"#,
        year = ctx.year,
    )
}

fn field(label: &str, value: &str) -> String {
    format!("<p><strong>{label}:</strong> {}</p>", escape_html(value))
}

fn section(background: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div style="background-color: {background}; padding: 20px; border-radius: 8px; margin: 20px 0;">
                <h3 style="margin-top: 0; color: #475569;">{title}</h3>
                {body}
            </div>"#
    )
}

fn holobox_sections(request: &HoloboxRequest) -> String {
    let contact = [
        field("Name", &request.name),
        field("Company", &request.company),
        field("Email", &request.email),
        field("Telephone", &request.telephone),
    ]
    .join("\n                ");
    let product = [field("Size", &request.size), field("Color", &request.color)]
        .join("\n                ");

    let mut sections = vec![
        section("#f8fafc", "Contact Information", &contact),
        section("#f1f5f9", "Product Configuration", &product),
    ];

    if let Some(extra) = request.request.as_deref().filter(|r| !r.trim().is_empty()) {
        sections.push(format!(
            r#"<div style="background-color: #fff; padding: 20px; border: 1px solid #e2e8f0; border-radius: 8px; margin: 20px 0;">
                <h3 style="margin-top: 0; color: #475569;">Additional Requirements</h3>
                <p style="white-space: pre-wrap;">{}</p>
            </div>"#,
            escape_html(extra)
        ));
    }
    sections.join("\n            ")
}

fn workshop_sections(booking: &WorkshopBooking) -> String {
    let contact = [field("Company", &booking.company), field("Email", &booking.email)]
        .join("\n                ");
    section("#f8fafc", "Contact Information", &contact)
}
