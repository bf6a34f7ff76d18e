use std::collections::{HashMap, HashSet};

use crate::{
    canon,
    lang::{Term, TermRef},
    prelude::Identifier,
};

pub fn free_variables(term: &Term) -> HashSet<Identifier> {
    fn rec<'a>(term: &'a Term, bound: &mut Vec<&'a Identifier>, free: &mut HashSet<Identifier>) {
        match term {
            Term::Variable(name) => {
                if !bound.contains(&name) {
                    free.insert(name.clone());
                }
            }
            Term::Abstract(param, body) => {
                bound.push(param);
                rec(body, bound, free);
                assert_eq!(Some(param), bound.pop());
            }
            Term::Apply(lhs, rhs) => {
                rec(lhs, bound, free);
                rec(rhs, bound, free);
            }
        }
    }
    let mut free = HashSet::new();
    rec(term, &mut vec![], &mut free);
    free
}

struct Renamer {
    used: HashSet<Identifier>,
    counter: usize,
}

impl Renamer {
    fn fresh(&mut self) -> Identifier {
        loop {
            let name = Identifier::new(canon::index_to_name(self.counter));
            self.counter += 1;
            if !self.used.contains(&name) {
                return name;
            }
        }
    }
}

/// Rebinds colliding binders so that every bound name is unique across the
/// whole tree and disjoint from the free variables. The result is
/// alpha-equivalent to the input, and the input comes back unchanged if it
/// already satisfies both conditions.
pub fn alpha_rename(term: &TermRef) -> TermRef {
    fn rec(
        term: &TermRef,
        renamer: &mut Renamer,
        mapping: &mut HashMap<Identifier, Identifier>,
    ) -> TermRef {
        match term.as_ref() {
            Term::Variable(name) => match mapping.get(name) {
                Some(target) if target != name => TermRef::new(Term::Variable(target.clone())),
                _ => term.clone(),
            },
            Term::Abstract(param, body) => {
                let target = if renamer.used.contains(param) {
                    renamer.fresh()
                } else {
                    param.clone()
                };
                renamer.used.insert(target.clone());
                let shadowed = mapping.insert(param.clone(), target.clone());
                let body = rec(body, renamer, mapping);
                match shadowed {
                    Some(prior) => mapping.insert(param.clone(), prior),
                    None => mapping.remove(param),
                };
                TermRef::new(Term::Abstract(target, body))
            }
            Term::Apply(lhs, rhs) => TermRef::new(Term::Apply(
                rec(lhs, renamer, mapping),
                rec(rhs, renamer, mapping),
            )),
        }
    }
    let mut renamer = Renamer {
        used: free_variables(term),
        counter: 0,
    };
    rec(term, &mut renamer, &mut HashMap::new())
}
