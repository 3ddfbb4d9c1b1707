use crate::error::SearchError;
use crate::tokenizer::normalize_word;

/// One token of a parsed query in postfix order: operators follow their
/// operands, so evaluation is a single stack pass with no precedence lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    Term(String),
    And,
    Or,
    Not,
}

/// Operators as they sit on the parse stack. Parentheses are scope markers
/// only and never win a precedence comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackOp {
    And,
    Or,
    Not,
    LParen,
}

fn precedence(op: StackOp) -> u8 {
    match op {
        StackOp::Not => 3,
        StackOp::And => 2,
        StackOp::Or => 1,
        StackOp::LParen => 0,
    }
}

/// Operator keywords are case-sensitive uppercase; `(` and `)` are standalone
/// tokens regardless of surrounding spacing.
fn is_operator_word(word: &str) -> bool {
    matches!(word, "AND" | "OR" | "NOT" | "(" | ")")
}

/// Parse a raw boolean query into postfix (RPN) order via shunting-yard with
/// an explicit operator stack.
///
/// Two consecutive bare terms are joined by an implicit OR, so `cat dog`
/// parses identically to `cat OR dog`. Operand terms are normalized through
/// the tokenizer's single-word path.
pub fn parse(raw: &str, stem: bool) -> Result<Vec<QueryToken>, SearchError> {
    let spaced = raw.replace('(', " ( ").replace(')', " ) ");
    let mut words: Vec<String> = spaced.split_whitespace().map(str::to_string).collect();

    // Implicit OR wherever one operand ends and the next begins with no
    // operator between them: bare adjacent terms, a term before `(`, a
    // group before a term, two adjacent groups.
    let ends_operand = |w: &str| !is_operator_word(w) || w == ")";
    let starts_operand = |w: &str| !is_operator_word(w) || w == "(";
    let mut i = 0;
    while i + 1 < words.len() {
        if ends_operand(&words[i]) && starts_operand(&words[i + 1]) {
            words.insert(i + 1, "OR".to_string());
        }
        i += 1;
    }

    let mut output: Vec<QueryToken> = Vec::new();
    let mut stack: Vec<StackOp> = Vec::new();

    for word in &words {
        match word.as_str() {
            "(" => stack.push(StackOp::LParen),
            ")" => loop {
                match stack.pop() {
                    Some(StackOp::LParen) => break,
                    Some(op) => output.push(op_token(op)),
                    None => return Err(SearchError::UnmatchedClosingParen),
                }
            },
            "AND" | "OR" | "NOT" => {
                let op = match word.as_str() {
                    "AND" => StackOp::And,
                    "OR" => StackOp::Or,
                    _ => StackOp::Not,
                };
                while let Some(&top) = stack.last() {
                    if precedence(top) > precedence(op) {
                        stack.pop();
                        output.push(op_token(top));
                    } else {
                        break;
                    }
                }
                stack.push(op);
            }
            term => output.push(QueryToken::Term(normalize_word(term, stem))),
        }
    }

    while let Some(op) = stack.pop() {
        if op == StackOp::LParen {
            return Err(SearchError::UnmatchedOpeningParen);
        }
        output.push(op_token(op));
    }

    Ok(output)
}

fn op_token(op: StackOp) -> QueryToken {
    match op {
        StackOp::And => QueryToken::And,
        StackOp::Or => QueryToken::Or,
        StackOp::Not => QueryToken::Not,
        StackOp::LParen => unreachable!("parens never reach the output queue"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use QueryToken::*;

    fn term(s: &str) -> QueryToken {
        Term(s.to_string())
    }

    #[test]
    fn precedence_orders_and_before_or() {
        let rpn = parse("a AND b OR c", false).unwrap();
        assert_eq!(rpn, vec![term("a"), term("b"), And, term("c"), Or]);
    }

    #[test]
    fn implicit_or_respects_grouping() {
        let rpn = parse("cat (dog OR bird)", false).unwrap();
        assert_eq!(rpn, vec![term("cat"), term("dog"), term("bird"), Or, Or]);
    }

    #[test]
    fn not_binds_tightest() {
        let rpn = parse("NOT cat AND dog", false).unwrap();
        assert_eq!(rpn, vec![term("cat"), Not, term("dog"), And]);
    }

    #[test]
    fn unmatched_closing_paren_is_rejected() {
        assert!(matches!(
            parse("a AND )", false),
            Err(SearchError::UnmatchedClosingParen)
        ));
    }

    #[test]
    fn unmatched_opening_paren_is_rejected() {
        assert!(matches!(
            parse("( a AND b", false),
            Err(SearchError::UnmatchedOpeningParen)
        ));
    }

    #[test]
    fn parens_split_off_adjacent_terms() {
        let rpn = parse("(cat)AND(dog)", false).unwrap();
        assert_eq!(rpn, vec![term("cat"), term("dog"), And]);
    }

    #[test]
    fn empty_query_parses_to_empty_rpn() {
        assert_eq!(parse("   ", false).unwrap(), vec![]);
    }
}
