//! Text parser for distributions and chained comparisons
//!
//! Distributions are written the way they print: `B(20, 0.25)`, `Po(12.3)`,
//! `Geo(0.2)`, `N(2, 0.5)`. Queries are comparison chains around `X`, such as
//! `3 < X <= 12` or `X != 4`, optionally wrapped as `P(...)`.

use crate::error::QueryError;
use probcalc_dists::{Binomial, Distribution, Geometric, Normal, Operand, Poisson, ProbabilityDistribution, Query};

type Result<T> = std::result::Result<T, QueryError>;

const VARIABLE: &str = "X";

/// Parse a distribution such as `B(20, 0.25)` or `Normal(2, 0.5)`
pub fn parse_distribution(input: &str) -> Result<Distribution> {
    let input = input.trim();
    let open = match input.find('(') {
        Some(pos) if input.ends_with(')') => pos,
        _ => {
            return Err(QueryError::parse(format!(
                "Expected a distribution like B(20, 0.25), got '{}'",
                input
            )))
        }
    };

    let name = input[..open].trim();
    let args: Vec<&str> = input[open + 1..input.len() - 1].split(',').map(str::trim).collect();

    let dist: Distribution = match name.to_ascii_lowercase().as_str() {
        "b" | "binomial" => {
            let [trials, probability] = arguments::<2>(name, &args)?;
            let trials = trials.parse::<u64>().map_err(|_| {
                QueryError::parse(format!("Number of trials must be a whole number, got '{}'", trials))
            })?;
            Binomial::new(trials, real(probability)?)?.into()
        }
        "po" | "poisson" => {
            let [rate] = arguments::<1>(name, &args)?;
            Poisson::new(real(rate)?)?.into()
        }
        "geo" | "geometric" => {
            let [probability] = arguments::<1>(name, &args)?;
            Geometric::new(real(probability)?)?.into()
        }
        "n" | "normal" => {
            let [mean, std_dev] = arguments::<2>(name, &args)?;
            Normal::new(real(mean)?, real(std_dev)?)?.into()
        }
        _ => return Err(QueryError::parse(format!("Unknown distribution '{}'", name))),
    };
    Ok(dist)
}

fn arguments<'a, const N: usize>(name: &str, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&'a str; N]>::try_from(args).map_err(|_| {
        QueryError::parse(format!("{} takes {} argument(s), got {}", name, N, args.len()))
    })
}

fn real(text: &str) -> Result<f64> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(QueryError::parse(format!("Expected a number, got '{}'", text))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Relation {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Relation {
    /// `a < X` is `X > a`
    fn reflect(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Term {
    Variable,
    Number(Operand),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Term(Term),
    Relation(Relation),
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();

    let mut i = 0;
    while i < chars.len() {
        let (byte_pos, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '<' | '>' | '=' | '!' => {
                let next_char = chars.get(i + 1).map(|&(_, c)| c);
                let (relation, len) = match (c, next_char) {
                    ('<', Some('=')) => (Relation::Le, 2),
                    ('>', Some('=')) => (Relation::Ge, 2),
                    ('=', Some('=')) => (Relation::Eq, 2),
                    ('!', Some('=')) => (Relation::Ne, 2),
                    ('<', _) => (Relation::Lt, 1),
                    ('>', _) => (Relation::Gt, 1),
                    _ => return Err(QueryError::parse(format!("Unexpected '{}' at position {}", c, byte_pos))),
                };
                tokens.push(Token::Relation(relation));
                i += len;
            }
            _ => {
                let mut end = i;
                while end < chars.len() && !chars[end].1.is_whitespace() && !"<>=!".contains(chars[end].1) {
                    end += 1;
                }
                let stop = chars.get(end).map_or(input.len(), |&(pos, _)| pos);
                tokens.push(Token::Term(term(&input[byte_pos..stop])?));
                i = end;
            }
        }
    }

    Ok(tokens)
}

fn term(text: &str) -> Result<Term> {
    if text == VARIABLE {
        return Ok(Term::Variable);
    }

    let digits = text.strip_prefix(&['-', '+'][..]).unwrap_or(text);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .map(|i| Term::Number(Operand::Integer(i)))
            .map_err(|_| QueryError::parse(format!("Integer out of range: {}", text)));
    }

    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Term::Number(Operand::Real(v))),
        _ => Err(QueryError::parse(format!("Unknown term '{}'", text))),
    }
}

fn apply<'d>(query: Query<'d>, relation: Relation, value: Operand) -> Result<Query<'d>> {
    let query = match relation {
        Relation::Eq => query.eq(value)?,
        Relation::Ne => query.ne(value)?,
        Relation::Lt => query.lt(value)?,
        Relation::Le => query.le(value)?,
        Relation::Gt => query.gt(value)?,
        Relation::Ge => query.ge(value)?,
    };
    Ok(query)
}

/// Parse a comparison chain against `distribution`.
///
/// Each link of the chain is applied to the query in order, so
/// `3 == X > 10` is an equality followed by a lower edge, with the same
/// errors the builder methods give for that sequence.
pub fn parse_query<'d>(input: &str, distribution: &'d dyn ProbabilityDistribution) -> Result<Query<'d>> {
    let mut input = input.trim();
    if let Some(inner) = input.strip_prefix("P(").and_then(|rest| rest.strip_suffix(')')) {
        input = inner.trim();
    }
    if input.is_empty() {
        return Err(QueryError::parse("Empty query"));
    }

    let tokens = tokenize(input)?;
    let mut query = Query::new(distribution);

    if let [Token::Term(Term::Variable)] = tokens.as_slice() {
        return Ok(query);
    }

    if tokens.len() < 3 || tokens.len() % 2 == 0 {
        return Err(QueryError::parse(format!("Incomplete comparison '{}'", input)));
    }

    for link in (0..tokens.len() - 1).step_by(2) {
        let (left, relation, right) = match (tokens[link], tokens[link + 1], tokens[link + 2]) {
            (Token::Term(left), Token::Relation(relation), Token::Term(right)) => (left, relation, right),
            _ => return Err(QueryError::parse(format!("Malformed comparison '{}'", input))),
        };

        query = match (left, right) {
            (Term::Variable, Term::Number(value)) => apply(query, relation, value)?,
            (Term::Number(value), Term::Variable) => apply(query, relation.reflect(), value)?,
            (Term::Variable, Term::Variable) => {
                return Err(QueryError::parse(format!("Cannot compare {} with itself", VARIABLE)))
            }
            (Term::Number(_), Term::Number(_)) => {
                return Err(QueryError::parse(format!("Every comparison must involve {}", VARIABLE)))
            }
        };
    }

    Ok(query)
}
