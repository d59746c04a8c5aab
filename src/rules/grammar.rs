//! Rule parsers built with chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::RuleError;
use crate::order::{ChildFilter, ComponentOrder, MethodOrder};
use crate::rules::lexer::Token;

/// Parse component-order rule text, e.g. `beforeSibling javax.swing.JButton`.
pub fn parse_component_order(input: &str) -> Result<ComponentOrder, RuleError> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::rules::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    component_order_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| first_error(errs, len))
}

/// Parse method-order rule text, e.g. `after setText(java.lang.String)`.
///
/// There is no `default` spelling: a method without a declared order rule
/// gets [`MethodOrder::Default`] by omission.
pub fn parse_method_order(input: &str) -> Result<MethodOrder, RuleError> {
    let len = input.len();

    let token_iter = crate::rules::lexer::lex(input).map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    method_order_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| first_error(errs, len))
}

/// Reduce chumsky's error list to the first error.
fn first_error(errs: Vec<Rich<'_, Token>>, len: usize) -> RuleError {
    errs.into_iter()
        .next()
        .map(RuleError::from)
        .unwrap_or_else(|| RuleError::Syntax {
            span: len..len,
            message: "Unparseable rule".to_string(),
            expected: Vec::new(),
        })
}

fn component_order_parser<'a, I>(
) -> impl Parser<'a, I, ComponentOrder, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let type_name = select! {
        Token::TypeName(s) => s,
    };

    choice((
        just(Token::Default).to(ComponentOrder::Default),
        just(Token::First).to(ComponentOrder::First),
        just(Token::Last).to(ComponentOrder::Last),
        just(Token::BeforeSibling)
            .ignore_then(type_name)
            .map(|type_name| ComponentOrder::BeforeSibling { type_name }),
    ))
    .then_ignore(end())
}

fn method_order_parser<'a, I>() -> impl Parser<'a, I, MethodOrder, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let signature = select! {
        Token::Signature(s) => s,
    };
    let type_name = select! {
        Token::TypeName(s) => s,
    };

    // `*` matches any child type, otherwise one or more type names
    let filter = choice((
        just(Token::Star).to(ChildFilter::Any),
        type_name
            .repeated()
            .at_least(1)
            .collect::<Vec<_>>()
            .map(ChildFilter::Types),
    ));

    choice((
        just(Token::First).to(MethodOrder::First),
        just(Token::Last).to(MethodOrder::Last),
        just(Token::AfterCreation).to(MethodOrder::AfterCreation),
        just(Token::BeforeAssociation).to(MethodOrder::BeforeAssociation),
        just(Token::AfterAssociation).to(MethodOrder::AfterAssociation),
        just(Token::After)
            .ignore_then(signature)
            .map(|signature| MethodOrder::After { signature }),
        just(Token::AfterChildren)
            .ignore_then(filter.clone())
            .map(|children| MethodOrder::AfterChildren { children }),
        just(Token::AfterParentChildren)
            .ignore_then(filter)
            .map(|children| MethodOrder::AfterParentChildren { children }),
    ))
    .then_ignore(end())
}
