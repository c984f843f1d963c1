//! Compile-time lexer behind `unix_command::cmd!`.
//!
//! The template is split into words, `'single quoted'` strings, `{var}`
//! interpolations and `{var...}` splats. Pieces not separated by whitespace
//! are glued into a single argument.
extern crate proc_macro;

use proc_macro::{Delimiter, Group, Literal, Span, TokenStream, TokenTree};

#[doc(hidden)]
#[proc_macro]
pub fn __cmd(macro_arg: TokenStream) -> TokenStream {
    let mut iter = macro_arg.into_iter();
    let (builder, literal) = match (iter.next(), iter.next().and_then(literal), iter.next()) {
        (Some(builder), Some(literal), None) => (builder, literal),
        _ => return compile_error("expected a plain string literal", Span::call_site()),
    };

    let text = literal.to_string();
    let text = match text.strip_prefix('"').and_then(|it| it.strip_suffix('"')) {
        Some(it) => it,
        None => return compile_error("expected a plain string literal", literal.span()),
    };

    match expand(builder, text, literal.span()) {
        Ok(ts) => ts,
        Err(msg) => compile_error(msg, literal.span()),
    }
}

/// `macro_rules!` may hand the literal over wrapped in an invisible group.
fn literal(tt: TokenTree) -> Option<Literal> {
    match tt {
        TokenTree::Literal(it) => Some(it),
        TokenTree::Group(group) if group.delimiter() == Delimiter::None => {
            let mut inner = group.stream().into_iter();
            match (inner.next(), inner.next()) {
                (Some(tt), None) => literal(tt),
                _ => None,
            }
        }
        _ => None,
    }
}

fn expand(builder: TokenTree, text: &str, call_site: Span) -> Result<TokenStream, &'static str> {
    let mut lexer = Lexer { rest: text };
    let mut res = TokenStream::new();

    let program = lexer.next().ok_or("command line is empty")??;
    if let Piece::Splat(_) = program.piece {
        return Err("can't splat the command name");
    }
    res.extend(Some(builder));
    res.extend(Some(program.piece.to_call_args(call_site)?));

    let mut prev_splat = false;
    for token in lexer {
        let token = token?;
        let splat = matches!(token.piece, Piece::Splat(_));
        if token.joined && (splat || prev_splat) {
            return Err("can't splat and concat simultaneously");
        }
        prev_splat = splat;

        let method = match (token.joined, splat) {
            (false, false) => ".arg",
            (false, true) => ".args",
            (true, _) => ".__extend_arg",
        };
        res.extend(parse_ts(method));
        res.extend(Some(token.piece.to_call_args(call_site)?));
    }

    Ok(res)
}

#[derive(Debug)]
struct Token<'a> {
    joined: bool,
    piece: Piece<'a>,
}

#[derive(Debug)]
enum Piece<'a> {
    Word(&'a str),
    Quoted(&'a str),
    Var(&'a str),
    Splat(&'a str),
}

impl Piece<'_> {
    /// Renders the piece as the parenthesized argument of a builder call.
    fn to_call_args(&self, call_site: Span) -> Result<TokenTree, &'static str> {
        let inner = match *self {
            Piece::Word(text) | Piece::Quoted(text) => parse_ts(&format!("\"{}\"", text)),
            Piece::Var(name) => respan(parse_ts(&format!("&({})", check_ident(name)?)), call_site),
            Piece::Splat(name) => respan(parse_ts(check_ident(name)?), call_site),
        };
        Ok(TokenTree::Group(Group::new(Delimiter::Parenthesis, inner)))
    }
}

fn check_ident(name: &str) -> Result<&str, &'static str> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err("can only interpolate variables")
    }
}

struct Lexer<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, &'static str>;

    fn next(&mut self) -> Option<Self::Item> {
        let trimmed = self.rest.trim_start();
        let joined = trimmed.len() == self.rest.len();
        self.rest = trimmed;
        if self.rest.is_empty() {
            return None;
        }
        Some(self.piece().map(|piece| Token { joined, piece }))
    }
}

impl<'a> Lexer<'a> {
    fn piece(&mut self) -> Result<Piece<'a>, &'static str> {
        let s = self.rest;
        let (len, piece) = if let Some(body) = s.strip_prefix('{') {
            let end = body.find('}').ok_or("unclosed `{` in command")?;
            let body = &body[..end];
            let piece = match body.strip_suffix("...") {
                Some(name) => Piece::Splat(name),
                None => Piece::Var(body),
            };
            (end + 2, piece)
        } else if let Some(body) = s.strip_prefix('\'') {
            let end = body.find('\'').ok_or("unclosed `'` in command")?;
            (end + 2, Piece::Quoted(&body[..end]))
        } else {
            let end = s
                .find(|it: char| it.is_ascii_whitespace() || it == '\'' || it == '{')
                .unwrap_or(s.len());
            (end, Piece::Word(&s[..end]))
        };
        self.rest = &s[len..];
        Ok(piece)
    }
}

fn respan(ts: TokenStream, span: Span) -> TokenStream {
    ts.into_iter()
        .map(|tt| match tt {
            TokenTree::Ident(mut ident) => {
                ident.set_span(ident.span().resolved_at(span));
                TokenTree::Ident(ident)
            }
            TokenTree::Group(group) => {
                TokenTree::Group(Group::new(group.delimiter(), respan(group.stream(), span)))
            }
            tt => tt,
        })
        .collect()
}

fn compile_error(msg: &str, span: Span) -> TokenStream {
    parse_ts(&format!("compile_error!({:?})", msg))
        .into_iter()
        .map(|mut tt| {
            tt.set_span(span);
            tt
        })
        .collect()
}

fn parse_ts(s: &str) -> TokenStream {
    s.parse().unwrap()
}
