use rpds::HashTrieMap;
use thiserror::Error;

use crate::{
    lang::{Term, TermRef},
    prelude::Identifier,
    rename,
};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("reduction exceeded the recursion depth limit ({0})")]
    RecursionLimitExceeded(u32),
}
pub type Result<T> = std::result::Result<T, EvalError>;

/// Whether a redex argument is reduced at binding time or at lookup time.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Mode {
    Eager,
    Lazy,
}

/// The only termination safeguard: the calculus is Turing-complete, so a
/// diverging term is cut off by depth rather than detected.
pub const RECURSION_LIMIT: u32 = 255;

const LOOKUP_COST: u64 = 1;
const CONTRACTION_COST: u64 = 3;

type Environment = HashTrieMap<Identifier, TermRef>;

#[derive(PartialEq, Eq, Debug)]
pub struct Outcome {
    pub term: TermRef,
    /// Weighted count of lookups and contractions, reset per call.
    pub steps: u64,
}

/// Beta-reduces `term`. Substitution never copies an abstraction body:
/// the environment maps a parameter name to the term standing in for it,
/// and a variable lookup reduces that entry on the spot. One environment
/// is safe across nested scopes only while bound names are unique, so the
/// input is alpha-renamed first.
pub fn reduce(term: &TermRef, mode: Mode) -> Result<Outcome> {
    let term = rename::alpha_rename(term);
    let mut steps = 0;
    let term = reduce_rec(&term, mode, &Environment::new(), 0, &mut steps)?;
    Ok(Outcome { term, steps })
}

fn reduce_rec(
    term: &TermRef,
    mode: Mode,
    env: &Environment,
    depth: u32,
    steps: &mut u64,
) -> Result<TermRef> {
    if depth == RECURSION_LIMIT {
        return Err(EvalError::RecursionLimitExceeded(RECURSION_LIMIT));
    }
    Ok(match term.as_ref() {
        Term::Variable(name) => match env.get(name) {
            Some(entry) => {
                *steps += LOOKUP_COST;
                reduce_rec(entry, mode, env, depth + 1, steps)?
            }
            None => term.clone(),
        },
        Term::Abstract(param, body) => TermRef::new(Term::Abstract(
            param.clone(),
            reduce_rec(body, mode, env, depth + 1, steps)?,
        )),
        Term::Apply(lhs, rhs) => {
            let lhs = reduce_rec(lhs, mode, env, depth + 1, steps)?;
            if let Term::Abstract(param, body) = lhs.as_ref() {
                *steps += CONTRACTION_COST;
                let argument = match mode {
                    Mode::Lazy => rhs.clone(),
                    Mode::Eager => reduce_rec(rhs, mode, env, depth + 1, steps)?,
                };
                let extended = env.insert(param.clone(), argument);
                reduce_rec(body, mode, &extended, depth + 1, steps)?
            } else {
                TermRef::new(Term::Apply(
                    lhs,
                    reduce_rec(rhs, mode, env, depth + 1, steps)?,
                ))
            }
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{canon::alpha_equiv, parser::parse_term};

    fn parse(s: &str) -> TermRef {
        parse_term(s).unwrap().forget_span()
    }

    fn run(s: &str, mode: Mode) -> Outcome {
        reduce(&parse(s), mode).unwrap()
    }

    #[test]
    fn test_identity_application() {
        for mode in [Mode::Eager, Mode::Lazy] {
            assert_eq!(run("(λx.x) (λy.y)", mode).term.to_string(), "λy. y");
        }
    }

    #[test]
    fn test_normal_terms_reduce_to_themselves() {
        for source in ["x", "λx. x", "λx. x y", "x (λy. y x) z"] {
            let term = parse(source);
            let outcome = reduce(&term, Mode::Eager).unwrap();
            assert_eq!(outcome.term, term, "{source}");
            assert_eq!(outcome.steps, 0, "{source}");
        }
    }

    #[test]
    fn test_church_addition() {
        let two = parse("λf. λx. f (f x)");
        for mode in [Mode::Eager, Mode::Lazy] {
            let outcome = run(
                "(λm. λn. λf. λx. m f (n f x)) (λf. λx. f x) (λf. λx. f x)",
                mode,
            );
            assert!(alpha_equiv(&outcome.term, &two), "{}", outcome.term);
        }
    }

    #[test]
    fn test_substitution_never_captures() {
        // the free y must not be bound by the inner binder of the same name
        let outcome = run("(λx. λy. x) y", Mode::Eager);
        assert_eq!(outcome.term.to_string(), "λa. y");
    }

    #[test]
    fn test_omega_hits_the_recursion_limit() {
        let omega = parse("(λx.(x x)) (λx.(x x))");
        assert!(matches!(
            reduce(&omega, Mode::Eager),
            Err(EvalError::RecursionLimitExceeded(_))
        ));
    }

    #[test]
    fn test_steps_are_counted() {
        // one contraction plus one lookup
        let outcome = run("(λx.x) y", Mode::Eager);
        assert_eq!(outcome.term.to_string(), "y");
        assert_eq!(outcome.steps, CONTRACTION_COST + LOOKUP_COST);
    }
}
