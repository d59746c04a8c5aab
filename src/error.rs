//! Error type for order-rule parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in rule text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Rule error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl RuleError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            RuleError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf)
                    .unwrap();
            }
        }
        String::from_utf8(buf).unwrap()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::rules::lexer::Token>> for RuleError {
    fn from(err: chumsky::error::Rich<'a, crate::rules::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        // A keyword where a type name or signature was expected reads better
        // with a dedicated message than a bare "unexpected token".
        let found_token = err.found().cloned();
        let found_keyword = found_token.as_ref().and_then(keyword_text);

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                if let Some(keyword) = found_keyword {
                    format!("Cannot use '{}' here - it's an order keyword", keyword)
                } else {
                    let found_str = match found {
                        Some(tok) => format_token(tok),
                        None => "end of input".to_string(),
                    };
                    format!("Unexpected {}", found_str)
                }
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| {
                match e {
                    chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                    chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                    chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                    chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                    chumsky::error::RichPattern::Any => Some("any token".to_string()),
                    chumsky::error::RichPattern::SomethingElse => None, // Skip "something else"
                }
            })
            .collect();

        RuleError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// The literal spelling of a keyword token, if the token is one.
fn keyword_text(tok: &crate::rules::lexer::Token) -> Option<&'static str> {
    use crate::rules::lexer::Token;
    match tok {
        Token::Default => Some("default"),
        Token::First => Some("first"),
        Token::Last => Some("last"),
        Token::BeforeSibling => Some("beforeSibling"),
        Token::AfterCreation => Some("afterCreation"),
        Token::After => Some("after"),
        Token::AfterChildren => Some("afterChildren"),
        Token::AfterParentChildren => Some("afterParentChildren"),
        Token::BeforeAssociation => Some("beforeAssociation"),
        Token::AfterAssociation => Some("afterAssociation"),
        _ => None,
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::rules::lexer::Token) -> String {
    use crate::rules::lexer::Token;
    match tok {
        Token::TypeName(s) => format!("type name '{}'", s),
        Token::Signature(s) => format!("signature '{}'", s),
        Token::Star => "'*'".to_string(),
        Token::Default => "keyword 'default'".to_string(),
        Token::First => "keyword 'first'".to_string(),
        Token::Last => "keyword 'last'".to_string(),
        Token::BeforeSibling => "keyword 'beforeSibling'".to_string(),
        Token::AfterCreation => "keyword 'afterCreation'".to_string(),
        Token::After => "keyword 'after'".to_string(),
        Token::AfterChildren => "keyword 'afterChildren'".to_string(),
        Token::AfterParentChildren => "keyword 'afterParentChildren'".to_string(),
        Token::BeforeAssociation => "keyword 'beforeAssociation'".to_string(),
        Token::AfterAssociation => "keyword 'afterAssociation'".to_string(),
    }
}
