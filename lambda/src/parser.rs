use chumsky::prelude::*;

use crate::{
    lang::{Term, TermRef, Token},
    prelude::*,
};

pub trait SimpleParser<I: Clone + std::hash::Hash, O>:
    Parser<I, O, Error = Error<I>> + Clone
{
    #[allow(clippy::type_complexity)]
    fn spanned(self) -> chumsky::combinator::MapWithSpan<Self, fn(O, Span) -> Spanned<O>, O>
    where
        Self: Sized,
        I: std::cmp::Eq,
    {
        self.map_with_span(|value, span| Spanned { span, value })
    }
}
impl<I: Clone + std::hash::Hash, O, T> SimpleParser<I, O> for T where
    T: Parser<I, O, Error = Error<I>> + Clone
{
}

pub fn lexer() -> impl SimpleParser<char, Vec<Spanned<Token>>> {
    let symbol = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('λ').to(Token::Lambda),
        just('^').to(Token::Lambda),
        just('.').to(Token::Dot),
    ));
    // one or more ASCII letters; digits and underscores are not names
    let variable = filter(|c: &char| c.is_ascii_alphabetic())
        .repeated()
        .at_least(1)
        .map(|letters: Vec<char>| Token::Variable(Identifier::new(letters.into_iter().collect())));
    let token = choice((symbol, variable));
    token.spanned().padded().repeated().then_ignore(end())
}

pub fn tokenize(s: &str) -> Result<Vec<Spanned<Token>>, Vec<Error<char>>> {
    lexer().parse(s)
}

fn term_parser() -> impl SimpleParser<Token, TermRef> {
    recursive(|term: Recursive<_, TermRef, _>| {
        let name = select! { Token::Variable(name) => name, };

        // x
        let variable = name
            .clone()
            .map(|name| TermRef::new(Term::Variable(name)))
            .labelled("variable");

        // ( Expr )
        let group = term
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .labelled("group");

        // λx. Expr, with the body reaching as far right as it can
        let abstraction = just(Token::Lambda)
            .ignore_then(name)
            .then_ignore(just(Token::Dot))
            .then(term.clone())
            .map(|(param, body)| TermRef::new(Term::Abstract(param, body)))
            .labelled("abstraction");

        let atom = choice((variable, group, abstraction));

        // Atom Atom*, associating applications to the left
        atom.clone()
            .then(atom.repeated())
            .foldl(|lhs, rhs| TermRef::new(Term::Apply(lhs, rhs)))
    })
    .labelled("term")
}

fn parse_full<T>(s: &str, parser: impl SimpleParser<Token, T>) -> Result<T, Vec<Error<String>>> {
    let len = s.chars().count();
    let eoi = Span {
        start: len,
        end: len + 1,
    };
    let tokens = tokenize(s).map_err(|es| {
        es.into_iter()
            .map(|e| e.map(|e| e.to_string()))
            .collect::<Vec<_>>()
    })?;
    let value = parser
        .then_ignore(end())
        .parse(chumsky::Stream::from_iter(
            eoi,
            tokens
                .into_iter()
                .map(|Spanned { span, value }| (value, span)),
        ))
        .map_err(|es| {
            es.into_iter()
                .map(|e| e.map(|e| e.to_string()))
                .collect::<Vec<_>>()
        })?;
    Ok(value)
}

pub fn parse_term(s: &str) -> Result<Spanned<TermRef>, Vec<Error<String>>> {
    parse_full(s, term_parser().spanned())
}
