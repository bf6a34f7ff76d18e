use std::collections::HashMap;

use crate::{
    lang::{Term, TermRef},
    prelude::Identifier,
    rename,
};

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maps an index into the name sequence `a, b, .., z, A, .., Z, aa, ab, ..`
/// (bijective base 52, most significant digit first).
pub fn index_to_name(index: usize) -> String {
    let mut index = index;
    let mut digits = vec![];
    loop {
        digits.push(LETTERS[index % LETTERS.len()] as char);
        index /= LETTERS.len();
        if index == 0 {
            break;
        }
        index -= 1;
    }
    digits.iter().rev().collect()
}

/// Rewrites every distinct name, bound or free, to a canonical one in order
/// of first appearance during a left-to-right, outside-in traversal.
pub fn alphabetize(term: &TermRef) -> TermRef {
    fn canonical(name: &Identifier, mapping: &mut HashMap<Identifier, Identifier>) -> Identifier {
        if let Some(target) = mapping.get(name) {
            return target.clone();
        }
        let target = Identifier::new(index_to_name(mapping.len()));
        mapping.insert(name.clone(), target.clone());
        target
    }
    fn rec(term: &TermRef, mapping: &mut HashMap<Identifier, Identifier>) -> TermRef {
        match term.as_ref() {
            Term::Variable(name) => TermRef::new(Term::Variable(canonical(name, mapping))),
            Term::Abstract(param, body) => {
                let param = canonical(param, mapping);
                TermRef::new(Term::Abstract(param, rec(body, mapping)))
            }
            Term::Apply(lhs, rhs) => {
                TermRef::new(Term::Apply(rec(lhs, mapping), rec(rhs, mapping)))
            }
        }
    }
    rec(term, &mut HashMap::new())
}

/// Equality up to consistent renaming. Both sides are alpha-renamed first
/// so that shadowing cannot fold distinct binders together, then
/// alphabetized into the same canonical name sequence.
pub fn alpha_equiv(lhs: &TermRef, rhs: &TermRef) -> bool {
    alphabetize(&rename::alpha_rename(lhs)) == alphabetize(&rename::alpha_rename(rhs))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse_term;

    fn parse(s: &str) -> TermRef {
        parse_term(s).unwrap().forget_span()
    }

    #[test]
    fn test_index_to_name() {
        assert_eq!(index_to_name(0), "a");
        assert_eq!(index_to_name(25), "z");
        assert_eq!(index_to_name(26), "A");
        assert_eq!(index_to_name(51), "Z");
        assert_eq!(index_to_name(52), "aa");
        assert_eq!(index_to_name(53), "ab");
        assert_eq!(index_to_name(103), "aZ");
        assert_eq!(index_to_name(104), "ba");
    }

    #[test]
    fn test_index_to_name_never_collides() {
        let names = (0..10_000).map(index_to_name).collect::<std::collections::HashSet<_>>();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn test_alphabetize() {
        assert_eq!(
            alphabetize(&parse("λq. λw. q w e")).to_string(),
            "λa. λb. a b c"
        );
        assert_eq!(alphabetize(&parse("z z (λk. k)")).to_string(), "a a (λb. b)");
    }

    #[test]
    fn test_alpha_equiv() {
        assert!(alpha_equiv(&parse("λx. λy. x"), &parse("λa. λb. a")));
        // shadowing is resolved before comparison
        assert!(alpha_equiv(&parse("λx. λx. x"), &parse("λa. λb. b")));
        assert!(!alpha_equiv(&parse("λx. λy. x"), &parse("λx. λy. y")));
        assert!(!alpha_equiv(&parse("λx. x"), &parse("λx. x x")));
    }

    mod prop {
        use proptest::prelude::*;

        use super::*;
        use crate::{lang::strategies, rename::alpha_rename};

        proptest! {
            #[test]
            fn renaming_never_changes_the_canonical_form(term in strategies::term()) {
                prop_assert!(alpha_equiv(&term, &alpha_rename(&term)));
            }

            #[test]
            fn alphabetize_is_idempotent(term in strategies::term()) {
                let once = alphabetize(&alpha_rename(&term));
                prop_assert_eq!(alphabetize(&once), once.clone());
            }
        }
    }
}
