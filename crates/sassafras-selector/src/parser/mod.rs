//! The selector-text parser.
//!
//! Accepts the CSS-selectors-with-`&` grammar Sass uses: type selectors
//! with namespaces, ids, classes, placeholders, attribute selectors with
//! case modifiers, pseudo selectors with `an+b` or selector arguments, all
//! four combinators (including the leading/trailing/doubled forms that
//! parse but warn), and explicit parent references with identifier
//! suffixes.
//!
//! The parser produces core selector values and never evaluates anything;
//! interpolation is resolved by the stylesheet parser before selector text
//! reaches this module.

use sassafras_common::{warn_once, SassError, SassResult, SourceSpan};

use crate::selector::complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
use crate::selector::compound::CompoundSelector;
use crate::selector::list::SelectorList;
use crate::selector::simple::{
    is_selector_pseudo_class, is_selector_pseudo_element, AttributeOp, AttributeSelector,
    PseudoSelector, QualifiedName, SimpleSelector,
};
use crate::utils::unvendor;

/// Parse a selector list (`a, b > c`) from source text.
pub fn parse_selector_list(source: &str) -> SassResult<SelectorList> {
    SelectorParser::new(source).parse_selector_list()
}

/// Parse a single compound selector (`a.b:hover`) from source text.
pub fn parse_compound_selector(source: &str) -> SassResult<CompoundSelector> {
    SelectorParser::new(source).parse_compound_selector()
}

/// Parse a single simple selector (`.b`) from source text.
pub fn parse_simple_selector(source: &str) -> SassResult<SimpleSelector> {
    SelectorParser::new(source).parse_simple_selector()
}

/// A character scanner with one character of lookahead and line tracking.
struct Scanner {
    chars: Vec<char>,
    position: usize,
    line: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self { chars: source.chars().collect(), position: 0, line: 0 }
    }

    fn is_done(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.peek();
        if let Some(c) = next {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
            }
        }
        next
    }

    fn scan(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            let _ = self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> SassResult<()> {
        if self.scan(expected) {
            Ok(())
        } else {
            Err(SassError::syntax(
                format!("Expected \"{expected}\"."),
                SourceSpan::at(self.position),
            ))
        }
    }

    fn span_at(&self) -> SourceSpan {
        SourceSpan::at(self.position)
    }
}

/// A recursive-descent parser over selector text.
pub struct SelectorParser {
    scanner: Scanner,
    allow_parent: bool,
    allow_placeholder: bool,
}

impl SelectorParser {
    /// Create a parser for `source` that allows parent references and
    /// placeholders.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            allow_parent: true,
            allow_placeholder: true,
        }
    }

    /// Configure whether `&` is allowed (it isn't inside `@keyframes`
    /// selectors, for example).
    #[must_use]
    pub const fn allow_parent(mut self, allow: bool) -> Self {
        self.allow_parent = allow;
        self
    }

    /// Configure whether `%placeholder` selectors are allowed.
    #[must_use]
    pub const fn allow_placeholder(mut self, allow: bool) -> Self {
        self.allow_placeholder = allow;
        self
    }

    /// Parse the input as a selector list, requiring all of it to be
    /// consumed. Selectors whose combinator structure makes them invalid
    /// CSS parse successfully but warn once.
    pub fn parse_selector_list(mut self) -> SassResult<SelectorList> {
        let list = self.read_selector_list()?;
        if !self.scanner.is_done() {
            return Err(SassError::syntax("expected selector.", self.scanner.span_at()));
        }
        if list.is_bogus_strict() {
            warn_once(
                "selector",
                &format!(
                    "The selector \"{list}\" is invalid CSS. \
                     It will be omitted from the generated CSS."
                ),
            );
        }
        Ok(list)
    }

    /// Parse the input as a single compound selector.
    pub fn parse_compound_selector(mut self) -> SassResult<CompoundSelector> {
        let compound = self.read_compound_selector()?;
        if !self.scanner.is_done() {
            return Err(SassError::syntax("expected selector.", self.scanner.span_at()));
        }
        Ok(compound)
    }

    /// Parse the input as a single simple selector.
    pub fn parse_simple_selector(mut self) -> SassResult<SimpleSelector> {
        let allow_parent = self.allow_parent;
        let simple = self.read_simple_selector(allow_parent)?;
        if !self.scanner.is_done() {
            return Err(SassError::syntax("unexpected token.", self.scanner.span_at()));
        }
        Ok(simple)
    }

    /// Consumes a selector list.
    fn read_selector_list(&mut self) -> SassResult<SelectorList> {
        let mut previous_line = self.scanner.line;
        let mut items = vec![self.read_complex_selector(false)?];

        let _ = self.scan_whitespace();
        while self.scanner.scan(',') {
            let _ = self.scan_whitespace();
            if self.scanner.peek() == Some(',') {
                continue;
            }
            if self.scanner.is_done() {
                break;
            }
            let line_break = self.scanner.line != previous_line;
            if line_break {
                previous_line = self.scanner.line;
            }
            items.push(self.read_complex_selector(line_break)?);
            let _ = self.scan_whitespace();
        }

        Ok(SelectorList::new(items))
    }

    /// Consumes a complex selector: compounds joined by combinators.
    fn read_complex_selector(&mut self, line_break: bool) -> SassResult<ComplexSelector> {
        let mut last_compound: Option<CompoundSelector> = None;
        let mut combinators: Vec<Combinator> = Vec::new();
        let mut leading_combinators: Vec<Combinator> = Vec::new();
        let mut components: Vec<ComplexSelectorComponent> = Vec::new();

        loop {
            let _ = self.scan_whitespace();
            let Some(next) = self.scanner.peek() else { break };
            match next {
                '+' => {
                    let _ = self.scanner.advance();
                    combinators.push(Combinator::NextSibling);
                }
                '>' => {
                    let _ = self.scanner.advance();
                    combinators.push(Combinator::Child);
                }
                '~' => {
                    let _ = self.scanner.advance();
                    combinators.push(Combinator::FollowingSibling);
                }
                _ => {
                    if !is_simple_start(next) && !self.looking_at_identifier() {
                        break;
                    }
                    if let Some(compound) = last_compound.take() {
                        components.push(ComplexSelectorComponent::new(
                            compound,
                            core::mem::take(&mut combinators),
                        ));
                    } else if !combinators.is_empty() {
                        leading_combinators = core::mem::take(&mut combinators);
                    }
                    last_compound = Some(self.read_compound_selector()?);
                    if self.scanner.peek() == Some('&') {
                        return Err(SassError::syntax(
                            "\"&\" may only used at the beginning of a compound selector.",
                            self.scanner.span_at(),
                        ));
                    }
                }
            }
        }

        if let Some(compound) = last_compound {
            components.push(ComplexSelectorComponent::new(compound, combinators));
        } else if !combinators.is_empty() {
            leading_combinators = combinators;
        } else if components.is_empty() {
            return Err(SassError::syntax("expected selector.", self.scanner.span_at()));
        }

        Ok(ComplexSelector::new(leading_combinators, components, line_break))
    }

    /// Consumes a compound selector, including a leading `&`.
    fn read_compound_selector(&mut self) -> SassResult<CompoundSelector> {
        let mut components: Vec<SimpleSelector> = Vec::new();
        let mut with_explicit_parent = false;

        if self.scanner.scan('&') {
            if !self.allow_parent {
                return Err(SassError::syntax(
                    "Parent selectors aren't allowed here.",
                    self.scanner.span_at(),
                ));
            }
            with_explicit_parent = true;
            if self.looking_at_identifier_body() {
                let mut suffix = String::new();
                self.read_identifier_body(&mut suffix)?;
                components.push(SimpleSelector::Type(QualifiedName::unnamespaced(suffix)));
            }
        } else {
            components.push(self.read_simple_selector(false)?);
        }

        while self.scanner.peek().is_some_and(is_simple_selector_start) {
            components.push(self.read_simple_selector(false)?);
        }

        Ok(CompoundSelector::new(components, with_explicit_parent))
    }

    /// Consumes a simple selector.
    fn read_simple_selector(&mut self, allow_parent: bool) -> SassResult<SimpleSelector> {
        match self.scanner.peek() {
            Some('[') => self.read_attribute_selector(),
            Some('.') => {
                let _ = self.scanner.advance();
                Ok(SimpleSelector::Class(self.read_identifier()?))
            }
            Some('#') => {
                let _ = self.scanner.advance();
                Ok(SimpleSelector::Id(self.read_identifier()?))
            }
            Some('%') => {
                if !self.allow_placeholder {
                    return Err(SassError::syntax(
                        "Placeholder selectors aren't allowed here.",
                        self.scanner.span_at(),
                    ));
                }
                let _ = self.scanner.advance();
                Ok(SimpleSelector::Placeholder(self.read_identifier()?))
            }
            Some(':') => self.read_pseudo_selector(),
            Some('&') => {
                if allow_parent {
                    Err(SassError::syntax("expected selector.", self.scanner.span_at()))
                } else {
                    Err(SassError::syntax(
                        "Parent selectors aren't allowed here.",
                        self.scanner.span_at(),
                    ))
                }
            }
            _ => self.read_type_or_universal_selector(),
        }
    }

    /// Consumes an attribute selector.
    fn read_attribute_selector(&mut self) -> SassResult<SimpleSelector> {
        self.scanner.expect('[')?;
        let _ = self.scan_whitespace();
        let name = self.read_attribute_name()?;
        let _ = self.scan_whitespace();

        if self.scanner.scan(']') {
            return Ok(SimpleSelector::Attribute(AttributeSelector {
                name,
                op: None,
                value: None,
                is_identifier: false,
                modifier: None,
            }));
        }

        let op = self.read_attribute_operator()?;
        let _ = self.scan_whitespace();

        let (value, is_identifier) = match self.scanner.peek() {
            Some('"' | '\'') => {
                let value = self.read_string()?;
                let is_identifier = is_identifier(&value);
                (value, is_identifier)
            }
            _ => (self.read_identifier()?, true),
        };
        let _ = self.scan_whitespace();

        let modifier = match self.scanner.peek() {
            Some(c) if c.is_alphabetic() => {
                let _ = self.scanner.advance();
                let _ = self.scan_whitespace();
                Some(c)
            }
            _ => None,
        };

        self.scanner.expect(']')?;
        Ok(SimpleSelector::Attribute(AttributeSelector {
            name,
            op: Some(op),
            value: Some(value),
            is_identifier,
            modifier,
        }))
    }

    /// Consumes an attribute name, with its optional namespace.
    fn read_attribute_name(&mut self) -> SassResult<QualifiedName> {
        if self.scanner.scan('*') {
            self.scanner.expect('|')?;
            return Ok(QualifiedName {
                name: self.read_identifier()?,
                namespace: Some("*".to_string()),
            });
        }
        if self.scanner.scan('|') {
            return Ok(QualifiedName {
                name: self.read_identifier()?,
                namespace: Some(String::new()),
            });
        }

        let name_or_namespace = self.read_identifier()?;
        if self.scanner.peek() != Some('|') || self.scanner.peek_at(1) == Some('=') {
            return Ok(QualifiedName { name: name_or_namespace, namespace: None });
        }
        let _ = self.scanner.advance();
        Ok(QualifiedName {
            name: self.read_identifier()?,
            namespace: Some(name_or_namespace),
        })
    }

    /// Consumes an attribute operator.
    fn read_attribute_operator(&mut self) -> SassResult<AttributeOp> {
        let span = self.scanner.span_at();
        match self.scanner.advance() {
            Some('=') => Ok(AttributeOp::Equal),
            Some('~') => {
                self.scanner.expect('=')?;
                Ok(AttributeOp::Includes)
            }
            Some('|') => {
                self.scanner.expect('=')?;
                Ok(AttributeOp::Dash)
            }
            Some('^') => {
                self.scanner.expect('=')?;
                Ok(AttributeOp::Prefix)
            }
            Some('$') => {
                self.scanner.expect('=')?;
                Ok(AttributeOp::Suffix)
            }
            Some('*') => {
                self.scanner.expect('=')?;
                Ok(AttributeOp::Substring)
            }
            _ => Err(SassError::syntax("Expected \"]\".", span)),
        }
    }

    /// Consumes a pseudo selector, including any argument.
    fn read_pseudo_selector(&mut self) -> SassResult<SimpleSelector> {
        self.scanner.expect(':')?;
        let element = self.scanner.scan(':');
        let name = self.read_identifier()?;

        if !self.scanner.scan('(') {
            return Ok(SimpleSelector::Pseudo(PseudoSelector::new(name, element)));
        }
        let _ = self.scan_whitespace();

        let unvendored = unvendor(&name).to_string();
        let mut argument: Option<String> = None;
        let mut selector: Option<SelectorList> = None;

        if element {
            if is_selector_pseudo_element(&unvendored) {
                selector = Some(self.read_chrooted_selector_list()?);
            } else {
                argument = Some(self.declaration_value()?);
            }
        } else if is_selector_pseudo_class(&unvendored) {
            let saved = self.allow_parent;
            self.allow_parent = true;
            let inner = self.read_chrooted_selector_list();
            self.allow_parent = saved;
            selector = Some(inner?);
        } else if unvendored == "nth-child" || unvendored == "nth-last-child" {
            let mut value = self.read_a_n_plus_b()?;
            let had_whitespace = self.scan_whitespace();
            if had_whitespace && self.scanner.peek() != Some(')') {
                self.expect_identifier("of")?;
                value.push_str(" of");
                let _ = self.scan_whitespace();
                selector = Some(self.read_selector_list()?);
            }
            argument = Some(value);
        } else {
            let mut value = self.declaration_value()?;
            value.truncate(value.trim_end().len());
            argument = Some(value);
        }
        self.scanner.expect(')')?;

        let mut pseudo = PseudoSelector::new(name, element);
        if let Some(argument) = argument {
            pseudo = pseudo.with_argument(argument);
        }
        if let Some(selector) = selector {
            if !selector.is_empty() {
                pseudo = pseudo.with_selector(Some(selector));
            }
        }
        Ok(SimpleSelector::Pseudo(pseudo))
    }

    /// Consumes a selector list whose alternatives are marked as rooted,
    /// as required for selector pseudo arguments.
    fn read_chrooted_selector_list(&mut self) -> SassResult<SelectorList> {
        let list = self.read_selector_list()?;
        Ok(SelectorList::new(
            list.components()
                .iter()
                .map(|complex| complex.clone().with_chroots(true))
                .collect(),
        ))
    }

    /// Consumes an `an+b` expression.
    fn read_a_n_plus_b(&mut self) -> SassResult<String> {
        let mut buffer = String::new();
        match self.scanner.peek() {
            Some('e' | 'E') => {
                self.expect_identifier("even")?;
                return Ok("even".to_string());
            }
            Some('o' | 'O') => {
                self.expect_identifier("odd")?;
                return Ok("odd".to_string());
            }
            Some(c @ ('+' | '-')) => {
                buffer.push(c);
                let _ = self.scanner.advance();
            }
            _ => {}
        }

        if self.scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
            while let Some(c) = self.scanner.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                buffer.push(c);
                let _ = self.scanner.advance();
            }
            let _ = self.scan_whitespace();
            if !self.scan_ident_char('n') {
                return Ok(buffer);
            }
        } else {
            if !self.scan_ident_char('n') {
                return Err(SassError::syntax("Expected \"n\".", self.scanner.span_at()));
            }
        }
        buffer.push('n');
        let _ = self.scan_whitespace();

        let Some(next) = self.scanner.peek() else { return Ok(buffer) };
        if next != '+' && next != '-' {
            return Ok(buffer);
        }
        buffer.push(next);
        let _ = self.scanner.advance();
        let _ = self.scan_whitespace();

        if !self.scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Err(SassError::syntax("Expected a number.", self.scanner.span_at()));
        }
        while let Some(c) = self.scanner.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            buffer.push(c);
            let _ = self.scanner.advance();
        }
        Ok(buffer)
    }

    /// Consumes a type or universal selector, with its optional namespace.
    fn read_type_or_universal_selector(&mut self) -> SassResult<SimpleSelector> {
        match self.scanner.peek() {
            Some('*') => {
                let _ = self.scanner.advance();
                if !self.scanner.scan('|') {
                    return Ok(SimpleSelector::Type(QualifiedName::unnamespaced("*")));
                }
                if self.scanner.scan('*') {
                    return Ok(SimpleSelector::Type(QualifiedName {
                        name: "*".to_string(),
                        namespace: Some("*".to_string()),
                    }));
                }
                Ok(SimpleSelector::Type(QualifiedName {
                    name: self.read_identifier()?,
                    namespace: Some("*".to_string()),
                }))
            }
            Some('|') => {
                let _ = self.scanner.advance();
                if self.scanner.scan('*') {
                    return Ok(SimpleSelector::Type(QualifiedName {
                        name: "*".to_string(),
                        namespace: Some(String::new()),
                    }));
                }
                Ok(SimpleSelector::Type(QualifiedName {
                    name: self.read_identifier()?,
                    namespace: Some(String::new()),
                }))
            }
            _ => {
                let name_or_namespace = self.read_identifier()?;
                if !self.scanner.scan('|') {
                    return Ok(SimpleSelector::Type(QualifiedName {
                        name: name_or_namespace,
                        namespace: None,
                    }));
                }
                if self.scanner.scan('*') {
                    return Ok(SimpleSelector::Type(QualifiedName {
                        name: "*".to_string(),
                        namespace: Some(name_or_namespace),
                    }));
                }
                Ok(SimpleSelector::Type(QualifiedName {
                    name: self.read_identifier()?,
                    namespace: Some(name_or_namespace),
                }))
            }
        }
    }

    /// Consumes a CSS identifier, decoding escapes.
    fn read_identifier(&mut self) -> SassResult<String> {
        let mut text = String::new();
        if self.scanner.scan('-') {
            text.push('-');
            if self.scanner.scan('-') {
                text.push('-');
                self.read_identifier_body(&mut text)?;
                return Ok(text);
            }
        }

        match self.scanner.peek() {
            Some(c) if is_name_start(c) => {
                text.push(c);
                let _ = self.scanner.advance();
            }
            Some('\\') => {
                text.push(self.read_escape()?);
            }
            _ => {
                return Err(SassError::syntax(
                    "Expected identifier.",
                    self.scanner.span_at(),
                ));
            }
        }
        self.read_identifier_body(&mut text)?;
        Ok(text)
    }

    /// Consumes the continuation characters of an identifier.
    fn read_identifier_body(&mut self, buffer: &mut String) -> SassResult<()> {
        loop {
            match self.scanner.peek() {
                Some(c) if is_name(c) => {
                    buffer.push(c);
                    let _ = self.scanner.advance();
                }
                Some('\\') => buffer.push(self.read_escape()?),
                _ => return Ok(()),
            }
        }
    }

    /// Consumes a backslash escape and returns the character it denotes.
    fn read_escape(&mut self) -> SassResult<char> {
        self.scanner.expect('\\')?;
        let Some(first) = self.scanner.advance() else {
            return Err(SassError::syntax(
                "Expected escape sequence.",
                self.scanner.span_at(),
            ));
        };
        if !first.is_ascii_hexdigit() {
            return Ok(first);
        }

        let mut value = first.to_digit(16).unwrap_or(0);
        for _ in 0..5 {
            match self.scanner.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    value = value * 16 + digit;
                    let _ = self.scanner.advance();
                }
                None => break,
            }
        }
        // A single whitespace terminates the escape and is consumed.
        if self.scanner.peek().is_some_and(char::is_whitespace) {
            let _ = self.scanner.advance();
        }
        Ok(char::from_u32(value).unwrap_or('\u{fffd}'))
    }

    /// Consumes a quoted string, decoding simple escapes, and returns its
    /// contents.
    fn read_string(&mut self) -> SassResult<String> {
        let Some(quote) = self.scanner.advance() else {
            return Err(SassError::syntax("Expected string.", self.scanner.span_at()));
        };
        let mut value = String::new();
        loop {
            match self.scanner.advance() {
                None => {
                    return Err(SassError::syntax(
                        format!("Expected \"{quote}\"."),
                        self.scanner.span_at(),
                    ));
                }
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.scanner.advance() {
                    Some(escaped) => value.push(escaped),
                    None => {
                        return Err(SassError::syntax(
                            "Expected escape sequence.",
                            self.scanner.span_at(),
                        ));
                    }
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// Consumes a raw declaration-style value: everything up to the `)`
    /// that closes the current argument, with balanced brackets and
    /// strings kept verbatim.
    fn declaration_value(&mut self) -> SassResult<String> {
        let mut buffer = String::new();
        let mut depth = 0_usize;
        loop {
            let Some(c) = self.scanner.peek() else {
                return Err(SassError::syntax("Expected \")\".", self.scanner.span_at()));
            };
            match c {
                '(' | '[' | '{' => {
                    depth += 1;
                    buffer.push(c);
                    let _ = self.scanner.advance();
                }
                ')' => {
                    if depth == 0 {
                        return Ok(buffer);
                    }
                    depth -= 1;
                    buffer.push(c);
                    let _ = self.scanner.advance();
                }
                ']' | '}' => {
                    depth = depth.saturating_sub(1);
                    buffer.push(c);
                    let _ = self.scanner.advance();
                }
                quote @ ('"' | '\'') => {
                    buffer.push(quote);
                    let _ = self.scanner.advance();
                    loop {
                        match self.scanner.advance() {
                            None => {
                                return Err(SassError::syntax(
                                    format!("Expected \"{quote}\"."),
                                    self.scanner.span_at(),
                                ));
                            }
                            Some('\\') => {
                                buffer.push('\\');
                                if let Some(escaped) = self.scanner.advance() {
                                    buffer.push(escaped);
                                }
                            }
                            Some(inner) => {
                                buffer.push(inner);
                                if inner == quote {
                                    break;
                                }
                            }
                        }
                    }
                }
                _ => {
                    buffer.push(c);
                    let _ = self.scanner.advance();
                }
            }
        }
    }

    /// Consumes whitespace and comments; returns whether anything was
    /// consumed.
    fn scan_whitespace(&mut self) -> bool {
        let mut consumed = false;
        loop {
            match self.scanner.peek() {
                Some(c) if c.is_whitespace() => {
                    let _ = self.scanner.advance();
                    consumed = true;
                }
                Some('/') if self.scanner.peek_at(1) == Some('*') => {
                    let _ = self.scanner.advance();
                    let _ = self.scanner.advance();
                    while !self.scanner.is_done() {
                        if self.scanner.scan('*') {
                            if self.scanner.scan('/') {
                                break;
                            }
                        } else {
                            let _ = self.scanner.advance();
                        }
                    }
                    consumed = true;
                }
                _ => return consumed,
            }
        }
    }

    /// Consumes `c` or its uppercase form; returns whether it was there.
    fn scan_ident_char(&mut self, c: char) -> bool {
        match self.scanner.peek() {
            Some(next) if next.eq_ignore_ascii_case(&c) => {
                let _ = self.scanner.advance();
                true
            }
            _ => false,
        }
    }

    /// Consumes the identifier `literal` case-insensitively.
    fn expect_identifier(&mut self, literal: &str) -> SassResult<()> {
        for c in literal.chars() {
            if !self.scan_ident_char(c) {
                return Err(SassError::syntax(
                    format!("Expected \"{literal}\"."),
                    self.scanner.span_at(),
                ));
            }
        }
        Ok(())
    }

    /// Whether the next characters begin an identifier.
    fn looking_at_identifier(&self) -> bool {
        match self.scanner.peek() {
            Some(c) if is_name_start(c) => true,
            Some('\\') => true,
            Some('-') => matches!(
                self.scanner.peek_at(1),
                Some(c) if is_name_start(c) || c == '-' || c == '\\'
            ),
            _ => false,
        }
    }

    /// Whether the next character continues an identifier.
    fn looking_at_identifier_body(&self) -> bool {
        matches!(self.scanner.peek(), Some(c) if is_name(c) || c == '\\')
    }
}

/// Whether `c` can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Whether `c` can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_name(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-'
}

/// Characters that can begin a compound selector.
const fn is_simple_start(c: char) -> bool {
    matches!(c, '[' | '.' | '#' | '%' | ':' | '&' | '*' | '|')
}

/// Characters that continue a compound selector after its first simple
/// selector.
const fn is_simple_selector_start(c: char) -> bool {
    matches!(c, '.' | '#' | '%' | '[' | ':')
}

/// Whether `text` would parse as a bare CSS identifier.
fn is_identifier(text: &str) -> bool {
    let mut rest = text.chars();
    let Some(first) = rest.next() else { return false };
    let first = if first == '-' {
        match rest.next() {
            None => return false,
            Some(second) => second,
        }
    } else {
        first
    };
    if !is_name_start(first) && first != '-' {
        return false;
    }
    rest.all(is_name)
}
