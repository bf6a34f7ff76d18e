use std::rc::Rc;

use crate::prelude::*;

#[derive(PartialEq, Eq, Hash, Clone, derive_more::Display, Debug)]
pub enum Token {
    #[display(fmt = "(")]
    LParen,
    #[display(fmt = ")")]
    RParen,
    #[display(fmt = "λ")]
    Lambda,
    #[display(fmt = ".")]
    Dot,
    #[display(fmt = "{_0}")]
    Variable(Identifier),
}

pub type TermRef = Rc<Term>;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Term {
    /// `x`
    Variable(Identifier),
    /// `λx. t`
    Abstract(Identifier, TermRef),
    /// `t t`
    Apply(TermRef, TermRef),
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Minimal parenthesization: an application keeps its parentheses
        // except along the left spine, an abstraction body never needs any,
        // and neither does the outermost term.
        fn fmt_rec(term: &Term, wrap: bool, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match term {
                Term::Variable(name) => f.write_str(name),
                Term::Abstract(param, body) => {
                    if wrap {
                        f.write_str("(")?;
                    }
                    f.write_fmt(format_args!("λ{param}. "))?;
                    fmt_rec(body, false, f)?;
                    if wrap {
                        f.write_str(")")?;
                    }
                    Ok(())
                }
                Term::Apply(lhs, rhs) => {
                    if wrap {
                        f.write_str("(")?;
                    }
                    fmt_rec(lhs, !matches!(lhs.as_ref(), Term::Apply(_, _)), f)?;
                    f.write_str(" ")?;
                    fmt_rec(rhs, true, f)?;
                    if wrap {
                        f.write_str(")")?;
                    }
                    Ok(())
                }
            }
        }
        fmt_rec(self, false, f)
    }
}

#[cfg(test)]
pub mod strategies {
    use proptest::prelude::*;

    use super::{Term, TermRef};
    use crate::prelude::Identifier;

    pub fn name() -> impl Strategy<Value = Identifier> {
        "[a-z]{1,2}".prop_map(Identifier::new)
    }

    pub fn term() -> impl Strategy<Value = TermRef> {
        let leaf = name().prop_map(|name| TermRef::new(Term::Variable(name)));
        leaf.prop_recursive(5, 48, 2, |inner| {
            prop_oneof![
                (name(), inner.clone())
                    .prop_map(|(param, body)| TermRef::new(Term::Abstract(param, body))),
                (inner.clone(), inner)
                    .prop_map(|(lhs, rhs)| TermRef::new(Term::Apply(lhs, rhs))),
            ]
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn var(name: &str) -> TermRef {
        TermRef::new(Term::Variable(Identifier::new(name.to_string())))
    }
    fn abs(param: &str, body: TermRef) -> TermRef {
        TermRef::new(Term::Abstract(Identifier::new(param.to_string()), body))
    }
    fn apply(lhs: TermRef, rhs: TermRef) -> TermRef {
        TermRef::new(Term::Apply(lhs, rhs))
    }

    #[test]
    fn test_display_variables_and_abstractions() {
        assert_eq!(var("x").to_string(), "x");
        assert_eq!(abs("x", var("x")).to_string(), "λx. x");
        assert_eq!(abs("x", apply(var("x"), var("x"))).to_string(), "λx. x x");
    }

    #[test]
    fn test_display_keeps_only_necessary_parentheses() {
        // the left spine of an application needs no parentheses
        assert_eq!(
            apply(apply(var("a"), var("b")), var("c")).to_string(),
            "a b c"
        );
        // a right-nested application does
        assert_eq!(
            apply(var("a"), apply(var("b"), var("c"))).to_string(),
            "a (b c)"
        );
        // an abstraction in function position stays parenthesized
        assert_eq!(
            apply(abs("x", var("x")), var("y")).to_string(),
            "(λx. x) y"
        );
        assert_eq!(
            apply(var("f"), abs("x", var("x"))).to_string(),
            "f (λx. x)"
        );
        assert_eq!(
            abs(
                "f",
                abs("x", apply(var("f"), apply(var("f"), var("x"))))
            )
            .to_string(),
            "λf. λx. f (f x)"
        );
    }
}
