use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::ast::{
    CallArgument, EntryNode, EntryValue, Expression, FunctionReference, NumberLiteral, Pattern,
    PatternElement, SelectExpression, Variant, VariantKey,
};

pub const MAX_PLACEABLES: usize = 100;
pub const MAX_NESTING_DEPTH: usize = 64;

const TRAILING_WS: &[char] = &[' ', '\t', '\n', '\r'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    ExpectedEntryStart,
    ExpectedToken(char),
    ExpectedIdentifier,
    ExpectedKeyword,
    ExpectedLiteral,
    ExpectedSelectorEnd,
    ExpectedCallSeparator,
    ExpectedNamedArgumentValue,
    UnknownLiteral(String),
    UnterminatedString,
    InvalidUnicodeEscape(String),
    UnknownEscape(String),
    TermWithoutValue,
    MessageWithoutValue,
    AttributeWithoutValue,
    VariantWithoutValue,
    MissingVariants,
    VariantsOnNewLine,
    TermAttributeAsPlaceable,
    MessageReferenceAsSelector,
    VariantAsSelector,
    MessageAttributeAsSelector,
    FunctionNameNotUppercase,
    TooManyPlaceables,
    TooDeeplyNested,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::ExpectedEntryStart => {
                f.write_str("expected an entry to start at the beginning of a line")
            }
            ParseErrorKind::ExpectedToken(token) => write!(f, "expected \"{token}\""),
            ParseErrorKind::ExpectedIdentifier => f.write_str("expected an identifier"),
            ParseErrorKind::ExpectedKeyword => {
                f.write_str("expected a keyword (starting with [a-zA-Z_])")
            }
            ParseErrorKind::ExpectedLiteral => f.write_str("expected literal"),
            ParseErrorKind::ExpectedSelectorEnd => f.write_str("expected \"}\" or \"->\""),
            ParseErrorKind::ExpectedCallSeparator => f.write_str("expected \",\" or \")\""),
            ParseErrorKind::ExpectedNamedArgumentValue => {
                f.write_str("expected string in quotes or number")
            }
            ParseErrorKind::UnknownLiteral(literal) => write!(f, "unknown literal \"{literal}\""),
            ParseErrorKind::UnterminatedString => f.write_str("unterminated string expression"),
            ParseErrorKind::InvalidUnicodeEscape(sequence) => {
                write!(f, "invalid unicode escape sequence: \\u{sequence}")
            }
            ParseErrorKind::UnknownEscape(sequence) => {
                write!(f, "unknown escape sequence: \\{sequence}")
            }
            ParseErrorKind::TermWithoutValue => f.write_str("expected term to have a value"),
            ParseErrorKind::MessageWithoutValue => {
                f.write_str("expected message to have a value or attributes")
            }
            ParseErrorKind::AttributeWithoutValue => {
                f.write_str("expected attribute to have a value")
            }
            ParseErrorKind::VariantWithoutValue => f.write_str("expected variant to have a value"),
            ParseErrorKind::MissingVariants => {
                f.write_str("expected members for the select expression")
            }
            ParseErrorKind::VariantsOnNewLine => {
                f.write_str("variants should be listed in a new line")
            }
            ParseErrorKind::TermAttributeAsPlaceable => {
                f.write_str("attributes of private messages cannot be interpolated")
            }
            ParseErrorKind::MessageReferenceAsSelector => {
                f.write_str("message references cannot be used as selectors")
            }
            ParseErrorKind::VariantAsSelector => f.write_str("variants cannot be used as selectors"),
            ParseErrorKind::MessageAttributeAsSelector => {
                f.write_str("attributes of public messages cannot be used as selectors")
            }
            ParseErrorKind::FunctionNameNotUppercase => {
                f.write_str("function names must be all upper-case")
            }
            ParseErrorKind::TooManyPlaceables => write!(
                f,
                "too many placeables, maximum allowed is {MAX_PLACEABLES}"
            ),
            ParseErrorKind::TooDeeplyNested => write!(
                f,
                "placeables nested too deeply, maximum depth is {MAX_NESTING_DEPTH}"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.kind, self.span.line, self.span.column
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Entries parsed from one FTL source, plus the errors of every entry that was
/// abandoned along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub entries: BTreeMap<String, EntryValue>,
    pub errors: Vec<ParseError>,
}

type ParseResult<T> = Result<T, ParseError>;

pub fn parse_resource(source: &str) -> Resource {
    let mut parser = Parser::new(source);
    let mut errors = Vec::new();
    parser.skip_ws();
    while parser.index < parser.bytes.len() {
        let entry_start = parser.index;
        if let Err(error) = parser.entry() {
            errors.push(error);
            parser.skip_to_next_entry_start(entry_start);
        }
        parser.skip_ws();
    }
    Resource {
        entries: parser.entries,
        errors,
    }
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    index: usize,
    depth: usize,
    entries: BTreeMap<String, EntryValue>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            index: 0,
            depth: 0,
            entries: BTreeMap::new(),
        }
    }

    fn entry(&mut self) -> ParseResult<()> {
        if self.index != 0 && self.bytes[self.index - 1] != b'\n' {
            return Err(self.error(ParseErrorKind::ExpectedEntryStart));
        }
        if self.peek() == Some(b'#') && matches!(self.peek_at(1), Some(b' ' | b'#' | b'\n')) {
            self.skip_comment();
            return Ok(());
        }
        self.message()
    }

    fn message(&mut self) -> ParseResult<()> {
        let id = self.entry_identifier()?;
        self.skip_inline_ws();
        self.expect(b'=')?;
        self.skip_inline_ws();
        let value = self.pattern()?;
        if id.starts_with('-') && value.is_none() {
            return Err(self.error(ParseErrorKind::TermWithoutValue));
        }

        let mut attributes = None;
        if self.peek() == Some(b' ') {
            let line_start = self.index;
            self.skip_inline_ws();
            if self.peek() == Some(b'.') {
                self.index = line_start;
                attributes = Some(self.attributes()?);
            }
        }

        let entry = match (value, attributes) {
            (Some(Pattern::Text(text)), None) => EntryValue::Text(text),
            (None, None) => return Err(self.error(ParseErrorKind::MessageWithoutValue)),
            (value, attributes) => EntryValue::Node(EntryNode { value, attributes }),
        };
        self.entries.insert(id, entry);
        Ok(())
    }

    fn pattern(&mut self) -> ParseResult<Option<Pattern>> {
        let start = self.index;
        let eol = self.find_newline(start).unwrap_or(self.bytes.len());
        let first_line = if start != eol {
            Some(self.source[start..eol].trim_end_matches(TRAILING_WS))
        } else {
            None
        };

        if let Some(line) = first_line
            && (line.contains('{') || line.contains('\\'))
        {
            return self.complex_pattern();
        }

        self.index = (eol + 1).min(self.bytes.len());
        self.skip_blank_lines();
        if self.peek() != Some(b' ') {
            return Ok(first_line.map(|line| Pattern::Text(line.to_string())));
        }

        let line_start = self.index;
        self.skip_inline_ws();
        if self.peek() == Some(b'.') {
            self.index = line_start;
            return Ok(first_line.map(|line| Pattern::Text(line.to_string())));
        }

        if first_line.is_some_and(|line| !line.is_empty()) {
            self.index = start;
        }
        self.complex_pattern()
    }

    fn complex_pattern(&mut self) -> ParseResult<Option<Pattern>> {
        let mut buffer = String::new();
        let mut elements = Vec::new();
        let mut placeables = 0usize;
        let mut run_start = self.index;

        while let Some(byte) = self.peek() {
            match byte {
                b'\n' => {
                    let line = &self.source[run_start..self.index];
                    buffer.push_str(line.strip_suffix('\r').unwrap_or(line));
                    self.index += 1;
                    let blank_start = self.index;
                    self.skip_blank_lines();
                    let blank_end = self.index;
                    run_start = self.index;
                    if self.peek() != Some(b' ') {
                        break;
                    }
                    self.skip_inline_ws();
                    if matches!(self.peek(), Some(b'}' | b'[' | b'*' | b'.')) {
                        self.index = blank_end;
                        run_start = self.index;
                        break;
                    }
                    buffer.extend(
                        self.source[blank_start..blank_end]
                            .chars()
                            .filter(|ch| *ch != '\r'),
                    );
                    if !buffer.is_empty() || !elements.is_empty() {
                        buffer.push('\n');
                    }
                    run_start = self.index;
                }
                b'\\' => {
                    buffer.push_str(&self.source[run_start..self.index]);
                    buffer.push(self.escaped(&[b'{', b'\\'])?);
                    run_start = self.index;
                }
                b'{' => {
                    buffer.push_str(&self.source[run_start..self.index]);
                    if !buffer.is_empty() {
                        elements.push(PatternElement::Text(core::mem::take(&mut buffer)));
                    }
                    if placeables >= MAX_PLACEABLES {
                        return Err(self.error(ParseErrorKind::TooManyPlaceables));
                    }
                    elements.push(PatternElement::Placeable(self.placeable()?));
                    placeables += 1;
                    run_start = self.index;
                }
                _ => self.index += 1,
            }
        }
        buffer.push_str(&self.source[run_start..self.index]);

        let trimmed = buffer.trim_end_matches(TRAILING_WS);
        if elements.is_empty() {
            if buffer.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Pattern::Text(trimmed.to_string())));
        }
        if !trimmed.is_empty() {
            elements.push(PatternElement::Text(trimmed.to_string()));
        }
        Ok(Some(Pattern::Elements(elements)))
    }

    fn escaped(&mut self, specials: &[u8]) -> ParseResult<char> {
        self.index += 1;
        match self.peek() {
            Some(byte) if specials.contains(&byte) => {
                self.index += 1;
                Ok(char::from(byte))
            }
            Some(b'u') => {
                let sequence_start = self.index + 1;
                let sequence_end = (sequence_start + 4).min(self.bytes.len());
                let digits = &self.bytes[sequence_start..sequence_end];
                if digits.len() == 4 && digits.iter().all(u8::is_ascii_hexdigit) {
                    let code = u32::from_str_radix(&self.source[sequence_start..sequence_end], 16)
                        .ok()
                        .and_then(char::from_u32);
                    if let Some(ch) = code {
                        self.index = sequence_end;
                        return Ok(ch);
                    }
                }
                let sequence = self.source[sequence_start..].chars().take(4).collect();
                Err(self.error(ParseErrorKind::InvalidUnicodeEscape(sequence)))
            }
            _ => {
                let sequence = self.source[self.index..]
                    .chars()
                    .next()
                    .map(String::from)
                    .unwrap_or_default();
                Err(self.error(ParseErrorKind::UnknownEscape(sequence)))
            }
        }
    }

    fn placeable(&mut self) -> ParseResult<Expression> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(ParseErrorKind::TooDeeplyNested));
        }
        self.depth += 1;
        let placeable = self.placeable_body();
        self.depth -= 1;
        placeable
    }

    fn placeable_body(&mut self) -> ParseResult<Expression> {
        self.index += 1;
        let start = self.index;
        self.skip_ws();
        if self.peek() == Some(b'*')
            || (self.peek() == Some(b'[') && self.peek_at(1) != Some(b']'))
        {
            let (variants, default) = self.variants()?;
            self.close_placeable()?;
            return Ok(Expression::Select(SelectExpression {
                selector: None,
                variants,
                default,
            }));
        }

        self.index = start;
        self.skip_inline_ws();
        let selector = self.selector_expression()?;
        self.skip_ws();
        if self.peek() == Some(b'}') {
            if let Expression::Attribute { id, .. } = &selector
                && id.starts_with('-')
            {
                return Err(self.error(ParseErrorKind::TermAttributeAsPlaceable));
            }
            self.index += 1;
            return Ok(selector);
        }

        if self.peek() != Some(b'-') || self.peek_at(1) != Some(b'>') {
            return Err(self.error(ParseErrorKind::ExpectedSelectorEnd));
        }
        match &selector {
            Expression::Reference { .. } => {
                return Err(self.error(ParseErrorKind::MessageReferenceAsSelector));
            }
            Expression::Variant { .. } => {
                return Err(self.error(ParseErrorKind::VariantAsSelector));
            }
            Expression::Attribute { id, .. } if !id.starts_with('-') => {
                return Err(self.error(ParseErrorKind::MessageAttributeAsSelector));
            }
            _ => {}
        }

        self.index += 2;
        self.skip_inline_ws();
        if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
            self.index += 1;
        }
        if self.peek() != Some(b'\n') {
            return Err(self.error(ParseErrorKind::VariantsOnNewLine));
        }
        self.skip_ws();
        let (variants, default) = self.variants()?;
        if variants.is_empty() {
            return Err(self.error(ParseErrorKind::MissingVariants));
        }
        self.close_placeable()?;
        Ok(Expression::Select(SelectExpression {
            selector: Some(Box::new(selector)),
            variants,
            default,
        }))
    }

    fn close_placeable(&mut self) -> ParseResult<()> {
        self.skip_ws();
        self.expect(b'}')
    }

    fn selector_expression(&mut self) -> ParseResult<Expression> {
        if self.peek() == Some(b'{') {
            return self.placeable();
        }

        let literal = self.literal()?;
        let Expression::Reference { name } = literal else {
            return Ok(literal);
        };

        match self.peek() {
            Some(b'.') => {
                self.index += 1;
                let attribute = self.identifier()?;
                Ok(Expression::Attribute {
                    id: name,
                    name: attribute,
                })
            }
            Some(b'[') => {
                self.index += 1;
                let key = self.variant_key()?;
                Ok(Expression::Variant { id: name, key })
            }
            Some(b'(') => {
                self.index += 1;
                let arguments = self.call_arguments()?;
                if !is_function_name(&name) {
                    return Err(self.error(ParseErrorKind::FunctionNameNotUppercase));
                }
                self.expect(b')')?;
                Ok(Expression::Call {
                    callee: FunctionReference { name },
                    arguments,
                })
            }
            _ => Ok(Expression::Reference { name }),
        }
    }

    fn call_arguments(&mut self) -> ParseResult<Vec<CallArgument>> {
        let mut arguments = Vec::new();
        while self.index < self.bytes.len() {
            self.skip_ws();
            if self.peek() == Some(b')') {
                break;
            }

            let expression = self.selector_expression()?;
            let argument = match expression {
                Expression::Reference { name } => {
                    self.skip_inline_ws();
                    if self.peek() == Some(b':') {
                        self.index += 1;
                        self.skip_ws();
                        let value = self.selector_expression()?;
                        if !matches!(value, Expression::String(_) | Expression::Number(_)) {
                            return Err(self.error(ParseErrorKind::ExpectedNamedArgumentValue));
                        }
                        CallArgument::Named { name, value }
                    } else {
                        CallArgument::Positional(Expression::Reference { name })
                    }
                }
                other => CallArgument::Positional(other),
            };
            arguments.push(argument);

            self.skip_ws();
            match self.peek() {
                Some(b')') => break,
                Some(b',') => self.index += 1,
                _ => return Err(self.error(ParseErrorKind::ExpectedCallSeparator)),
            }
        }
        Ok(arguments)
    }

    fn attributes(&mut self) -> ParseResult<BTreeMap<String, Pattern>> {
        let mut attributes = BTreeMap::new();
        while self.peek() == Some(b' ') {
            self.skip_inline_ws();
            if self.peek() != Some(b'.') {
                break;
            }
            self.index += 1;
            let name = self.identifier()?;
            self.skip_inline_ws();
            self.expect(b'=')?;
            self.skip_inline_ws();
            let Some(value) = self.pattern()? else {
                return Err(self.error(ParseErrorKind::AttributeWithoutValue));
            };
            attributes.insert(name, value);
            self.skip_blank_lines();
        }
        Ok(attributes)
    }

    fn variants(&mut self) -> ParseResult<(Vec<Variant>, Option<usize>)> {
        let mut variants = Vec::new();
        let mut default = None;
        while let Some(byte) = self.peek() {
            if (byte != b'[' || self.peek_at(1) == Some(b'[')) && byte != b'*' {
                break;
            }
            if byte == b'*' {
                self.index += 1;
                default = Some(variants.len());
            }
            self.expect(b'[')?;
            let key = self.variant_key()?;
            self.skip_inline_ws();
            let Some(value) = self.pattern()? else {
                return Err(self.error(ParseErrorKind::VariantWithoutValue));
            };
            variants.push(Variant { key, value });
            self.skip_ws();
        }
        Ok((variants, default))
    }

    fn variant_key(&mut self) -> ParseResult<VariantKey> {
        self.skip_inline_ws();
        let key = match self.peek() {
            Some(byte) if byte.is_ascii_digit() || byte == b'-' => {
                VariantKey::Number(self.number()?)
            }
            _ => VariantKey::Keyword(self.variant_name()?),
        };
        self.skip_inline_ws();
        self.expect(b']')?;
        Ok(key)
    }

    fn variant_name(&mut self) -> ParseResult<String> {
        let start = self.index;
        match self.peek() {
            Some(byte) if byte.is_ascii_alphabetic() || byte == b'_' || byte == b' ' => {
                self.index += 1;
            }
            _ => return Err(self.error(ParseErrorKind::ExpectedKeyword)),
        }
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b' ') {
                self.index += 1;
            } else {
                break;
            }
        }
        while self.index > start + 1 && self.bytes[self.index - 1] == b' ' {
            self.index -= 1;
        }
        Ok(self.source[start..self.index].to_string())
    }

    fn literal(&mut self) -> ParseResult<Expression> {
        let first = self.peek();
        if first == Some(b'$') {
            self.index += 1;
            let name = self.identifier()?;
            return Ok(Expression::Variable { name });
        }

        let lead = if first == Some(b'-') {
            self.peek_at(1)
        } else {
            first
        };
        match lead {
            Some(byte) if byte.is_ascii_alphabetic() => Ok(Expression::Reference {
                name: self.entry_identifier()?,
            }),
            Some(byte) if byte.is_ascii_digit() => Ok(Expression::Number(self.number()?)),
            _ if first == Some(b'"') => Ok(Expression::String(self.string()?)),
            _ => Err(self.error(ParseErrorKind::ExpectedLiteral)),
        }
    }

    fn number(&mut self) -> ParseResult<NumberLiteral> {
        let start = self.index;
        if self.peek() == Some(b'-') {
            self.index += 1;
        }
        if !self.skip_digits() {
            let raw = self.source[start..self.index].to_string();
            return Err(self.error(ParseErrorKind::UnknownLiteral(raw)));
        }
        if self.peek() == Some(b'.') {
            self.index += 1;
            if !self.skip_digits() {
                let raw = self.source[start..self.index].to_string();
                return Err(self.error(ParseErrorKind::UnknownLiteral(raw)));
            }
        }

        let raw = &self.source[start..self.index];
        match raw.parse::<f64>() {
            Ok(value) => Ok(NumberLiteral {
                raw: raw.to_string(),
                value,
            }),
            Err(_) => Err(self.error(ParseErrorKind::UnknownLiteral(raw.to_string()))),
        }
    }

    fn string(&mut self) -> ParseResult<String> {
        self.index += 1;
        let mut value = String::new();
        let mut run_start = self.index;
        loop {
            match self.peek() {
                Some(b'"') => {
                    value.push_str(&self.source[run_start..self.index]);
                    self.index += 1;
                    return Ok(value);
                }
                Some(b'\\') => {
                    value.push_str(&self.source[run_start..self.index]);
                    value.push(self.escaped(&[b'{', b'\\', b'"'])?);
                    run_start = self.index;
                }
                Some(b'\n') | None => {
                    return Err(self.error(ParseErrorKind::UnterminatedString));
                }
                Some(_) => self.index += 1,
            }
        }
    }

    fn identifier(&mut self) -> ParseResult<String> {
        let start = self.index;
        self.scan_identifier(start)
    }

    fn entry_identifier(&mut self) -> ParseResult<String> {
        let start = self.index;
        if self.peek() == Some(b'-') {
            self.index += 1;
        }
        self.scan_identifier(start)
    }

    fn scan_identifier(&mut self, start: usize) -> ParseResult<String> {
        if !self.peek().is_some_and(|byte| byte.is_ascii_alphabetic()) {
            self.index = start;
            self.bump_char();
            return Err(self.error(ParseErrorKind::ExpectedIdentifier));
        }
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                self.index += 1;
            } else {
                break;
            }
        }
        Ok(self.source[start..self.index].to_string())
    }

    fn skip_comment(&mut self) {
        let mut eol = self.find_newline(self.index);
        while let Some(end) = eol {
            if self.bytes.get(end + 1) == Some(&b'#')
                && matches!(self.bytes.get(end + 2), Some(b' ' | b'#'))
            {
                self.index = end + 3;
                eol = self.find_newline(self.index);
            } else {
                break;
            }
        }
        self.index = eol.map_or(self.bytes.len(), |end| end + 1);
    }

    fn skip_to_next_entry_start(&mut self, entry_start: usize) {
        let mut start = self.index.max(entry_start + 1).min(self.bytes.len());
        loop {
            if (start == 0 || self.bytes.get(start - 1) == Some(&b'\n'))
                && self
                    .bytes
                    .get(start)
                    .is_some_and(|byte| byte.is_ascii_alphabetic() || *byte == b'-')
            {
                self.index = start;
                return;
            }
            match self.find_newline(start) {
                Some(end) => start = end + 1,
                None => {
                    self.index = self.bytes.len();
                    return;
                }
            }
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\n' | b'\t' | b'\r')) {
            self.index += 1;
        }
    }

    fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.index += 1;
        }
    }

    fn skip_blank_lines(&mut self) {
        loop {
            let line_start = self.index;
            self.skip_inline_ws();
            if self.peek() == Some(b'\r') && self.peek_at(1) == Some(b'\n') {
                self.index += 2;
            } else if self.peek() == Some(b'\n') {
                self.index += 1;
            } else {
                self.index = line_start;
                break;
            }
        }
    }

    fn skip_digits(&mut self) -> bool {
        let start = self.index;
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.index += 1;
        }
        self.index > start
    }

    fn bump_char(&mut self) {
        if let Some(ch) = self.source.get(self.index..).and_then(|rest| rest.chars().next()) {
            self.index += ch.len_utf8();
        }
    }

    fn expect(&mut self, token: u8) -> ParseResult<()> {
        if self.peek() == Some(token) {
            self.index += 1;
            Ok(())
        } else {
            Err(self.error(ParseErrorKind::ExpectedToken(char::from(token))))
        }
    }

    fn find_newline(&self, from: usize) -> Option<usize> {
        self.bytes
            .get(from..)?
            .iter()
            .position(|byte| *byte == b'\n')
            .map(|offset| from + offset)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.index + offset).copied()
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        let offset = self.index.min(self.bytes.len());
        let before = &self.bytes[..offset];
        let line_start = before
            .iter()
            .rposition(|byte| *byte == b'\n')
            .map_or(0, |position| position + 1);
        let line = before.iter().filter(|byte| **byte == b'\n').count() + 1;
        let column = before[line_start..]
            .iter()
            .filter(|byte| (**byte & 0xC0) != 0x80)
            .count()
            + 1;
        ParseError {
            kind,
            span: Span {
                start: offset,
                end: offset,
                line: u32::try_from(line).unwrap_or(u32::MAX),
                column: u32::try_from(column).unwrap_or(u32::MAX),
            },
        }
    }
}

fn is_function_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    bytes.next().is_some_and(|byte| byte.is_ascii_uppercase())
        && bytes.all(|byte| byte.is_ascii_uppercase() || matches!(byte, b'_' | b'?' | b'-'))
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::{String, ToString};
    use alloc::vec;

    use super::{MAX_NESTING_DEPTH, MAX_PLACEABLES, ParseErrorKind, parse_resource};
    use crate::ast::{
        CallArgument, EntryValue, Expression, Pattern, PatternElement, VariantKey,
    };

    fn text(value: &str) -> Pattern {
        Pattern::Text(value.to_string())
    }

    #[test]
    fn parses_simple_messages_as_text() {
        let resource = parse_resource("hello = Hello, world!\nbye = Bye   \n");
        assert!(resource.errors.is_empty());
        assert_eq!(
            resource.entries.get("hello"),
            Some(&EntryValue::Text("Hello, world!".to_string()))
        );
        assert_eq!(
            resource.entries.get("bye"),
            Some(&EntryValue::Text("Bye".to_string()))
        );
    }

    #[test]
    fn skips_comments() {
        let source = "# Simple things are simple.\n## group\n#\nhello = Hi\n### resource\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty());
        assert_eq!(resource.entries.len(), 1);
    }

    #[test]
    fn joins_multiline_patterns() {
        let source = "multi =\n    first line\n\n    second line\nnext = x\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty());
        assert_eq!(
            resource.entries.get("multi"),
            Some(&EntryValue::Text("first line\n\nsecond line".to_string()))
        );

        let source = "inline = starts here\n    and continues\n";
        let resource = parse_resource(source);
        assert_eq!(
            resource.entries.get("inline"),
            Some(&EntryValue::Text("starts here\nand continues".to_string()))
        );
    }

    #[test]
    fn parses_attributes_without_value() {
        let source = "login-input =\n    .placeholder = email@example.com\n    .title = Login\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty());
        let entry = resource.entries.get("login-input").expect("entry");
        assert!(entry.value().is_none());
        assert_eq!(entry.attribute("placeholder"), Some(&text("email@example.com")));
        assert_eq!(entry.attribute("title"), Some(&text("Login")));
    }

    #[test]
    fn parses_value_with_attributes() {
        let source = "login = Predefined value\n    .placeholder = {$email}\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty());
        let entry = resource.entries.get("login").expect("entry");
        assert_eq!(entry.value(), Some(&text("Predefined value")));
        assert_eq!(
            entry.attribute("placeholder"),
            Some(&Pattern::Elements(vec![PatternElement::Placeable(
                Expression::Variable {
                    name: "email".to_string()
                }
            )]))
        );
    }

    #[test]
    fn parses_placeables_and_trims_trailing_text() {
        let resource = parse_resource("greet = Hello, { $name }!  \n");
        assert!(resource.errors.is_empty());
        let entry = resource.entries.get("greet").expect("entry");
        assert_eq!(
            entry.value(),
            Some(&Pattern::Elements(vec![
                PatternElement::Text("Hello, ".to_string()),
                PatternElement::Placeable(Expression::Variable {
                    name: "name".to_string()
                }),
                PatternElement::Text("!".to_string()),
            ]))
        );
    }

    #[test]
    fn parses_select_expressions() {
        let source = "emails = { $n ->\n    [one] One email\n   *[other] { $n } emails\n}\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        let pattern = resource
            .entries
            .get("emails")
            .and_then(EntryValue::value)
            .expect("pattern");
        let Pattern::Elements(elements) = pattern else {
            panic!("expected elements");
        };
        let PatternElement::Placeable(Expression::Select(select)) = &elements[0] else {
            panic!("expected select");
        };
        assert!(select.selector.is_some());
        assert_eq!(select.default, Some(1));
        assert_eq!(select.variants.len(), 2);
        assert_eq!(
            select.variants[0].key,
            VariantKey::Keyword("one".to_string())
        );
        assert_eq!(select.variants[0].value, text("One email"));
    }

    #[test]
    fn parses_numeric_variant_keys_and_padding() {
        let source = "n = { $n ->\n    [ 0 ] none\n    [-1.5] negative\n   *[ many things ] lots\n}\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        let pattern = resource
            .entries
            .get("n")
            .and_then(EntryValue::value)
            .expect("pattern");
        let Pattern::Elements(elements) = pattern else {
            panic!("expected elements");
        };
        let PatternElement::Placeable(Expression::Select(select)) = &elements[0] else {
            panic!("expected select");
        };
        let VariantKey::Number(zero) = &select.variants[0].key else {
            panic!("expected number key");
        };
        assert_eq!(zero.value, 0.0);
        let VariantKey::Number(negative) = &select.variants[1].key else {
            panic!("expected number key");
        };
        assert_eq!(negative.raw, "-1.5");
        assert_eq!(
            select.variants[2].key,
            VariantKey::Keyword("many things".to_string())
        );
    }

    #[test]
    fn parses_term_variant_lists() {
        let source = "-brand = {\n   *[nominative] Firefox\n    [accusative] Firefoxa\n}\nrestart = Zrestartuj {-brand[accusative]}.\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        let term = resource.entries.get("-brand").expect("term");
        let list = term
            .value()
            .and_then(Pattern::variant_list)
            .expect("variant list");
        assert_eq!(list.default, Some(0));

        let restart = resource
            .entries
            .get("restart")
            .and_then(EntryValue::value)
            .expect("pattern");
        assert_eq!(
            restart,
            &Pattern::Elements(vec![
                PatternElement::Text("Zrestartuj ".to_string()),
                PatternElement::Placeable(Expression::Variant {
                    id: "-brand".to_string(),
                    key: VariantKey::Keyword("accusative".to_string()),
                }),
                PatternElement::Text(".".to_string()),
            ])
        );
    }

    #[test]
    fn parses_attribute_references_without_padding() {
        let resource = parse_resource("a = {foo.bar}\nb = { foo.bar }\n");
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        let expected = Pattern::Elements(vec![PatternElement::Placeable(Expression::Attribute {
            id: "foo".to_string(),
            name: "bar".to_string(),
        })]);
        assert_eq!(resource.entries.get("a").and_then(EntryValue::value), Some(&expected));
        assert_eq!(resource.entries.get("b").and_then(EntryValue::value), Some(&expected));
    }

    #[test]
    fn parses_function_calls() {
        let source = "price = { NUMBER($amount, minimumFractionDigits: 2, style: \"decimal\") }\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        let pattern = resource
            .entries
            .get("price")
            .and_then(EntryValue::value)
            .expect("pattern");
        let Pattern::Elements(elements) = pattern else {
            panic!("expected elements");
        };
        let PatternElement::Placeable(Expression::Call { callee, arguments }) = &elements[0]
        else {
            panic!("expected call");
        };
        assert_eq!(callee.name, "NUMBER");
        assert_eq!(arguments.len(), 3);
        assert!(matches!(arguments[0], CallArgument::Positional(Expression::Variable { .. })));
        assert!(matches!(
            &arguments[2],
            CallArgument::Named { name, value: Expression::String(value) }
                if name == "style" && value == "decimal"
        ));
    }

    #[test]
    fn rejects_lowercase_function_names() {
        let resource = parse_resource("bad = { number($n) }\n");
        assert_eq!(resource.errors.len(), 1);
        assert_eq!(
            resource.errors[0].kind,
            ParseErrorKind::FunctionNameNotUppercase
        );
    }

    #[test]
    fn rejects_named_arguments_with_references() {
        let resource = parse_resource("bad = { NUMBER($n, style: other) }\n");
        assert_eq!(
            resource.errors[0].kind,
            ParseErrorKind::ExpectedNamedArgumentValue
        );
    }

    #[test]
    fn unescapes_text_and_strings() {
        let source = "esc = \\{ \\\\ \\u0041\nstr = { \"quote \\\" \\u00e9\" }\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        assert_eq!(
            resource.entries.get("esc"),
            Some(&EntryValue::Text("{ \\ A".to_string()))
        );
        assert_eq!(
            resource.entries.get("str").and_then(EntryValue::value),
            Some(&Pattern::Elements(vec![PatternElement::Placeable(
                Expression::String("quote \" é".to_string())
            )]))
        );
    }

    #[test]
    fn rejects_bad_escapes() {
        let resource = parse_resource("a = \\u12\nb = \\q\nc = \\uD800\nok = fine\n");
        assert_eq!(resource.errors.len(), 3);
        assert_eq!(
            resource.errors[0].kind,
            ParseErrorKind::InvalidUnicodeEscape("12\nb".to_string())
        );
        assert_eq!(
            resource.errors[1].kind,
            ParseErrorKind::UnknownEscape("q".to_string())
        );
        assert_eq!(
            resource.errors[2].kind,
            ParseErrorKind::InvalidUnicodeEscape("D800".to_string())
        );
        assert!(resource.entries.contains_key("ok"));
    }

    #[test]
    fn rejects_entries_without_values() {
        let resource = parse_resource("-term =\nmessage =\nok = yes\n");
        assert_eq!(resource.errors.len(), 2);
        assert_eq!(resource.errors[0].kind, ParseErrorKind::TermWithoutValue);
        assert_eq!(resource.errors[1].kind, ParseErrorKind::MessageWithoutValue);
        assert_eq!(resource.entries.len(), 1);
    }

    #[test]
    fn recovers_at_next_entry() {
        let source = "good = one\nbroken = { $x\n  continues here\nalso-good = two\n";
        let resource = parse_resource(source);
        assert_eq!(resource.errors.len(), 1);
        assert!(resource.entries.contains_key("good"));
        assert!(resource.entries.contains_key("also-good"));
        assert!(!resource.entries.contains_key("broken"));
    }

    #[test]
    fn rejects_indented_entries() {
        let resource = parse_resource("a = 1\n\t b = 2\nc = 3\n");
        assert_eq!(resource.errors.len(), 1);
        assert_eq!(resource.errors[0].kind, ParseErrorKind::ExpectedEntryStart);
        assert_eq!(resource.errors[0].span.line, 2);
        assert_eq!(resource.errors[0].span.column, 3);
        assert!(resource.entries.contains_key("c"));
    }

    #[test]
    fn rejects_invalid_selectors() {
        let source = "a = { msg ->\n *[x] y\n}\nb = { msg.attr ->\n *[x] y\n}\nc = { -term[x] ->\n *[x] y\n}\nd = { -term.attr }\n";
        let resource = parse_resource(source);
        let kinds: alloc::vec::Vec<_> = resource.errors.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ParseErrorKind::MessageReferenceAsSelector,
                ParseErrorKind::MessageAttributeAsSelector,
                ParseErrorKind::VariantAsSelector,
                ParseErrorKind::TermAttributeAsPlaceable,
            ]
        );
    }

    #[test]
    fn accepts_term_attribute_selectors() {
        let source = "a = { -brand.gender ->\n    [feminine] She\n   *[other] It\n}\n";
        let resource = parse_resource(source);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
    }

    #[test]
    fn requires_variants_on_new_line() {
        let resource = parse_resource("a = { $n -> *[x] y }\n");
        assert_eq!(resource.errors[0].kind, ParseErrorKind::VariantsOnNewLine);
    }

    #[test]
    fn caps_placeables_per_pattern() {
        let at_limit = format!("a = {}\n", "{ $x }".repeat(MAX_PLACEABLES));
        let resource = parse_resource(&at_limit);
        assert!(resource.errors.is_empty());

        let over_limit = format!(
            "before = first\na = {}\nafter = last\n",
            "{ $x }".repeat(MAX_PLACEABLES + 1)
        );
        let resource = parse_resource(&over_limit);
        assert_eq!(resource.errors.len(), 1);
        assert_eq!(resource.errors[0].kind, ParseErrorKind::TooManyPlaceables);
        assert!(!resource.entries.contains_key("a"));
        assert_eq!(
            resource.entries.get("before"),
            Some(&EntryValue::Text(String::from("first")))
        );
        assert_eq!(
            resource.entries.get("after"),
            Some(&EntryValue::Text(String::from("last")))
        );
    }

    #[test]
    fn limits_placeable_nesting() {
        let at_limit = format!(
            "a = {}x{}\n",
            "{".repeat(MAX_NESTING_DEPTH - 1),
            "}".repeat(MAX_NESTING_DEPTH - 1)
        );
        let resource = parse_resource(&at_limit);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        assert!(resource.entries.contains_key("a"));

        let nested = format!(
            "before = first\na = {}x{}\nafter = last\n",
            "{".repeat(500),
            "}".repeat(500)
        );
        let resource = parse_resource(&nested);
        assert_eq!(resource.errors.len(), 1);
        assert_eq!(resource.errors[0].kind, ParseErrorKind::TooDeeplyNested);
        assert!(!resource.entries.contains_key("a"));
        assert!(resource.entries.contains_key("before"));
        assert_eq!(
            resource.entries.get("after"),
            Some(&EntryValue::Text(String::from("last")))
        );
    }

    #[test]
    fn crlf_line_endings_match_lf() {
        let lf = "a = x\n    y\n\n    z\nb = { $n ->\n    [one] One\n   *[other] Many\n}\nc = C\n    .title = T\n";
        let crlf = lf.replace('\n', "\r\n");
        let expected = parse_resource(lf);
        let resource = parse_resource(&crlf);
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        assert_eq!(resource.entries, expected.entries);
        assert_eq!(
            resource.entries.get("a"),
            Some(&EntryValue::Text(String::from("x\ny\n\nz")))
        );
    }

    #[test]
    fn parses_nested_placeables() {
        let resource = parse_resource("a = { { \"inner\" } } tail\n");
        assert!(resource.errors.is_empty(), "{:?}", resource.errors);
        assert_eq!(
            resource.entries.get("a").and_then(EntryValue::value),
            Some(&Pattern::Elements(vec![
                PatternElement::Placeable(Expression::String("inner".to_string())),
                PatternElement::Text(" tail".to_string()),
            ]))
        );
    }

    #[test]
    fn later_definition_wins_within_resource() {
        let resource = parse_resource("a = first\na = second\n");
        assert_eq!(
            resource.entries.get("a"),
            Some(&EntryValue::Text(String::from("second")))
        );
    }

    #[test]
    fn unterminated_string_at_end_of_input() {
        let resource = parse_resource("a = { \"open");
        assert_eq!(resource.errors[0].kind, ParseErrorKind::UnterminatedString);
    }

    #[test]
    fn display_includes_position() {
        let resource = parse_resource("a = { $n -> *[x] y }\n");
        let message = resource.errors[0].to_string();
        assert!(message.starts_with("variants should be listed in a new line at line 1"));
    }
}
