use rand::Rng;

/// Branch probabilities for random term production.
#[derive(Clone, Debug)]
pub struct Config {
    /// Chance of producing an abstraction at positive depth.
    pub abstraction: f64,
    /// Same, immediately inside a just-introduced abstraction.
    pub nested_abstraction: f64,
    /// Chance that the function position reuses the nearest binder.
    pub head_reuse: f64,
    /// Chance that the function position reuses any enclosing binder.
    pub head_bound: f64,
    /// Chance that the function position picks a free variable.
    pub head_free: f64,
    /// Base chance that the argument position reuses the nearest binder.
    pub argument_reuse: f64,
    /// Lowers or raises `argument_reuse` depending on whether the function
    /// position already reused it.
    pub argument_reuse_swing: f64,
    pub argument_bound: f64,
    pub argument_free: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            abstraction: 0.4,
            nested_abstraction: 0.25,
            head_reuse: 0.4,
            head_bound: 0.2,
            head_free: 0.15,
            argument_reuse: 0.25,
            argument_reuse_swing: 0.15,
            argument_bound: 0.25,
            argument_free: 0.2,
        }
    }
}

/// Produces a random well-formed source string with nesting bounded by
/// `depth`. The string always lexes and parses; nothing more is promised.
pub fn generate(rng: &mut impl Rng, depth: usize) -> String {
    generate_with(&Config::default(), rng, depth)
}

pub fn generate_with(config: &Config, rng: &mut impl Rng, depth: usize) -> String {
    rec(config, rng, depth, &mut Vec::new(), None)
}

fn letters(first: char, count: usize) -> Vec<String> {
    let available = (b'z' - first as u8 + 1) as usize;
    (0..count.min(available))
        .map(|offset| ((first as u8 + offset as u8) as char).to_string())
        .collect()
}

fn rec(
    config: &Config,
    rng: &mut impl Rng,
    depth: usize,
    bound: &mut Vec<String>,
    just_bound: Option<&str>,
) -> String {
    // a binder alphabet sized to the remaining depth, plus a disjoint
    // free-variable alphabet
    let binders = letters('a', depth + 2);
    let free = letters('m', depth + 1);

    if depth == 0 {
        let pool = binders.iter().chain(free.iter()).collect::<Vec<_>>();
        return pool[rng.gen_range(0..pool.len())].clone();
    }

    let abstraction = if just_bound.is_some() {
        config.nested_abstraction
    } else {
        config.abstraction
    };
    if rng.gen_bool(abstraction) {
        let param = binders[rng.gen_range(0..binders.len())].clone();
        bound.push(param.clone());
        let body = rec(config, rng, depth - 1, bound, Some(&param));
        bound.pop();
        return format!("(λ{param}.{body})");
    }

    let mut head_reused = false;
    let head = match just_bound {
        Some(name) if rng.gen_bool(config.head_reuse) => {
            head_reused = true;
            name.to_string()
        }
        _ if !bound.is_empty() && rng.gen_bool(config.head_bound) => {
            bound[rng.gen_range(0..bound.len())].clone()
        }
        _ if rng.gen_bool(config.head_free) => free[rng.gen_range(0..free.len())].clone(),
        _ => rec(config, rng, depth - 1, bound, None),
    };

    let swing = if head_reused {
        -config.argument_reuse_swing
    } else {
        config.argument_reuse_swing
    };
    let reuse = (config.argument_reuse + swing).clamp(0.0, 1.0);
    let argument = match just_bound {
        Some(name) if rng.gen_bool(reuse) => name.to_string(),
        _ if !bound.is_empty() && rng.gen_bool(config.argument_bound) => {
            bound[rng.gen_range(0..bound.len())].clone()
        }
        _ if rng.gen_bool(config.argument_free) => free[rng.gen_range(0..free.len())].clone(),
        _ => rec(config, rng, depth - 1, bound, None),
    };

    format!("({head} {argument})")
}
