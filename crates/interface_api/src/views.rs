//! HTML rendering
//!
//! Pages are small enough to be assembled with `format!`. Every value that
//! originates from a user (sentence text, echoed form input) goes through
//! [`escape`] before it is written into markup.

use domain_conversation::{
    Conversation, ConversationSummary, FieldErrors, Level, NewConversationForm, NewSentenceForm,
    Sentence, SpeakerType,
};
use std::fmt::Write;

use core_kernel::ConversationId;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
a { color: #2563eb; }
.error { color: #b91c1c; font-size: 0.9rem; }
.sentence { display: flex; gap: 0.75rem; margin: 0.5rem 0; align-items: flex-start; }
.sentence.person-b { flex-direction: row-reverse; text-align: right; }
.avatar { width: 2rem; height: 2rem; border-radius: 50%; background: #e5e7eb; display: flex; align-items: center; justify-content: center; font-weight: bold; flex-shrink: 0; }
.bubble { background: #f3f4f6; border-radius: 0.75rem; padding: 0.5rem 0.75rem; }
.narration { font-style: italic; color: #555; margin: 1rem 0; }
form.inline { display: inline; }
"#;

/// Escapes text for use in element content and quoted attribute values
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Path of a conversation's detail page
pub fn conversation_path(id: ConversationId) -> String {
    format!("/conversations/{}", id.as_uuid())
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/">Home</a> | <a href="/conversations">Conversations</a></nav>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape(message)))
        .unwrap_or_default()
}

fn value_of(value: &Option<String>) -> String {
    escape(value.as_deref().unwrap_or_default())
}

pub fn home(signed_in: bool) -> String {
    let next = if signed_in {
        r#"<p><a href="/conversations">Your conversations</a></p>"#
    } else {
        "<p>Sign in to see your conversations.</p>"
    };

    let body = format!(
        "<h1>Conversations</h1>\n<p>Write dialogue scripts for language lessons, line by line.</p>\n{next}"
    );
    layout("Conversations", &body)
}

pub fn conversation_list(conversations: &[ConversationSummary]) -> String {
    let mut body = String::from("<h1>Your conversations</h1>\n");
    body.push_str(r#"<p><a href="/conversations/new">New conversation</a></p>"#);

    if conversations.is_empty() {
        body.push_str("\n<p>No conversations yet.</p>");
    } else {
        body.push_str("\n<ul>\n");
        for conversation in conversations {
            let _ = writeln!(
                body,
                r#"<li><a href="{}">{}</a> <small>{}</small></li>"#,
                conversation_path(conversation.id),
                escape(&conversation.title()),
                conversation.created_at.format("%Y-%m-%d %H:%M"),
            );
        }
        body.push_str("</ul>");
    }

    layout("Your conversations", &body)
}

pub fn new_conversation_form(values: &NewConversationForm, errors: &FieldErrors) -> String {
    let selected = values
        .level
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(Level::parse_or_business);

    let mut options = String::from(r#"<option value="">Choose a level</option>"#);
    for level in Level::ALL {
        let _ = write!(
            options,
            r#"<option value="{level}"{}>{level}</option>"#,
            if selected == Some(level) { " selected" } else { "" },
        );
    }

    let body = format!(
        r#"<h1>New conversation</h1>
<form method="post" action="/conversations/new">
<p><label>Level <select name="level">{options}</select></label></p>
{level_error}
<p><label>Course <input type="number" name="course" min="1" value="{course}"></label></p>
{course_error}
<p><label>Lesson <input type="number" name="lesson" min="1" value="{lesson}"></label></p>
{lesson_error}
<p><button type="submit">Create</button></p>
</form>"#,
        level_error = field_error(errors, "level"),
        course = value_of(&values.course),
        course_error = field_error(errors, "course"),
        lesson = value_of(&values.lesson),
        lesson_error = field_error(errors, "lesson"),
    );

    layout("New conversation", &body)
}

fn sentence_html(sentence: &Sentence) -> String {
    let text = escape(&sentence.text);
    match sentence.speaker.initial() {
        None => format!(r#"<p class="narration">{text}</p>"#),
        Some(initial) => {
            let class = match sentence.speaker {
                SpeakerType::PersonB => "sentence person-b",
                _ => "sentence person-a",
            };
            format!(
                r#"<div class="{class}"><span class="avatar">{initial}</span><span class="bubble">{text}</span></div>"#
            )
        }
    }
}

pub fn conversation_detail(
    conversation: &Conversation,
    values: &NewSentenceForm,
    errors: &FieldErrors,
) -> String {
    let path = conversation_path(conversation.id);
    let title = conversation.title();

    let sentences = if conversation.sentences.is_empty() {
        "<p>No sentences yet.</p>".to_string()
    } else {
        conversation
            .sentences
            .iter()
            .map(sentence_html)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let selected = values
        .speaker
        .as_deref()
        .and_then(|raw| SpeakerType::parse(raw).ok())
        .unwrap_or_default();
    let mut speakers = String::new();
    for speaker in SpeakerType::ALL {
        let _ = write!(
            speakers,
            r#"<option value="{speaker}"{}>{speaker}</option>"#,
            if speaker == selected { " selected" } else { "" },
        );
    }

    let body = format!(
        r#"<h1>{title}</h1>
<section class="script">
{sentences}
</section>
<h2>Add a sentence</h2>
<form method="post" action="{path}/sentences">
<p><label>Speaker <select name="speaker">{speakers}</select></label></p>
{speaker_error}
<p><label>Text <textarea name="text" rows="2" cols="60">{text}</textarea></label></p>
{text_error}
<p><label>Position <input type="number" name="position" min="1" value="{position}"></label> <small>leave empty to append</small></p>
{position_error}
<p><button type="submit">Add</button></p>
</form>
<form class="inline" method="post" action="{path}/delete">
<button type="submit">Delete conversation</button>
</form>"#,
        title = escape(&title),
        speaker_error = field_error(errors, "speaker"),
        text = value_of(&values.text),
        text_error = field_error(errors, "text"),
        position = value_of(&values.position),
        position_error = field_error(errors, "position"),
    );

    layout(&title, &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>",
        escape(title),
        escape(message)
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::UserId;
    use domain_conversation::{NewConversation, NewSentence};

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_detail_escapes_sentence_text() {
        let mut conversation = Conversation::new(
            UserId::new(),
            NewConversation {
                level: Level::B1,
                course: 1,
                lesson: 1,
            },
        );
        let sentence = Sentence::new(
            conversation.id,
            conversation.next_position().unwrap(),
            NewSentence {
                speaker: SpeakerType::PersonA,
                text: "<script>alert(1)</script>".to_string(),
                position: None,
            },
        );
        conversation.sentences.push(sentence);

        let html = conversation_detail(&conversation, &NewSentenceForm::default(), &FieldErrors::new());
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains(r#"<span class="avatar">A</span>"#));
    }

    #[test]
    fn test_form_shows_errors_and_keeps_values() {
        let values = NewConversationForm {
            level: Some("C2".to_string()),
            course: Some("3".to_string()),
            lesson: None,
        };
        let errors = values.validate().unwrap_err();

        let html = new_conversation_form(&values, &errors);
        assert!(html.contains("lesson is required"));
        assert!(html.contains(r#"<option value="C2" selected>"#));
        assert!(html.contains(r#"name="course" min="1" value="3""#));
    }
}
