use colored::Colorize;

use crate::Sentiment;

/// Card background keyed to the label.
#[must_use]
pub fn card_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "green",
        Sentiment::Negative => "red",
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML card showing the label over the original text.
#[must_use]
pub fn html_card(text: &str, sentiment: Sentiment) -> String {
    format!(
        r#"<div style="background-color: {color}; padding: 10px; border-radius: 5px; margin: 10px 0;">
    <h5 style="color: white;">{sentiment} Sentiment</h5>
    <p style="color: white;">{text}</p>
</div>
"#,
        color = card_color(sentiment),
        text = escape_html(text),
    )
}

/// Terminal card: a coloured header line followed by the indented text.
#[must_use]
pub fn terminal_card(text: &str, sentiment: Sentiment, color: bool) -> String {
    let header = format!(" {sentiment} Sentiment ");
    let header = if color {
        let styled = header.bold().white();
        match sentiment {
            Sentiment::Positive => styled.on_green().to_string(),
            Sentiment::Negative => styled.on_red().to_string(),
        }
    } else {
        header
    };
    let body = text
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{header}\n{body}\n")
}
