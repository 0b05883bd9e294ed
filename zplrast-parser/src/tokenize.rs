use nom::{
    IResult, Parser,
    bytes::complete::take_till,
    character::complete::one_of,
    combinator::recognize,
    multi::many0,
    sequence::preceded,
};

fn is_introducer(c: char) -> bool {
    c == '^' || c == '~'
}

/// Drop vertical whitespace (LF, VT, FF, CR); it is not part of the grammar.
pub fn strip_vertical_whitespace(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\x0b' | '\x0c'))
        .collect()
}

fn command_token(input: &str) -> IResult<&str, &str> {
    recognize(preceded(one_of("^~"), take_till(is_introducer))).parse(input)
}

/// Slice a cleaned ZPL stream into command tokens.
///
/// Every `^` or `~` begins a new token and terminates the one in progress;
/// the introducer stays as the first character of the emitted token.
/// Material before the first introducer is discarded.
pub fn tokenize(input: &str) -> Vec<&str> {
    let leading: IResult<&str, &str> = take_till(is_introducer).parse(input);
    let Ok((input, _)) = leading else {
        return Vec::new();
    };
    let tokens: IResult<&str, Vec<&str>> = many0(command_token).parse(input);
    tokens.map(|(_, tokens)| tokens).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{strip_vertical_whitespace, tokenize};

    #[test]
    fn splits_on_both_introducers() {
        let tokens = tokenize("^XA~DGR:X.GRF,8,1,FF^XZ");
        assert_eq!(tokens, vec!["^XA", "~DGR:X.GRF,8,1,FF", "^XZ"]);
    }

    #[test]
    fn introducer_is_kept() {
        let tokens = tokenize("^FO10,20^FDHI^FS");
        assert_eq!(tokens, vec!["^FO10,20", "^FDHI", "^FS"]);
    }

    #[test]
    fn leading_material_is_discarded() {
        let tokens = tokenize("garbage^XA^XZ");
        assert_eq!(tokens, vec!["^XA", "^XZ"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("no commands here").is_empty());
    }

    #[test]
    fn vertical_whitespace_is_stripped() {
        let cleaned = strip_vertical_whitespace("^XA\n^FO1,2\r\n^FD a b \x0c^FS\x0b^XZ");
        assert_eq!(cleaned, "^XA^FO1,2^FD a b ^FS^XZ");
    }

    #[test]
    fn concatenated_tokens_reproduce_cleaned_input() {
        let raw = "^XA\n^FO10,20^A0N,30,20\n^FDHI^FS\r\n^XZ";
        let cleaned = strip_vertical_whitespace(raw);
        let tokens = tokenize(&cleaned);
        assert_eq!(tokens.concat(), cleaned);
    }
}
