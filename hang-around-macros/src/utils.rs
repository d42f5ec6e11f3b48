use proc_macro::{TokenStream, TokenTree};

/// Options accepted by the attribute macros.
#[derive(Default)]
pub(crate) struct Options {
    /// Context name, as a Rust string (already unquoted).
    pub(crate) name: Option<String>,

    /// Context stack size in bytes.
    pub(crate) stack_size: Option<usize>,
}

/// Splits a `TokenStream` into comma-separated arguments.
///
/// Each argument is returned as a `Vec<TokenTree>`.
/// Commas at the top level are used as separators.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(current);
                    current = Vec::new();
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Parses `key = value` pairs from an attribute's arguments.
///
/// Recognized keys are `stack_size` (integer literal, non-zero) and `name`
/// (string literal).
pub(crate) fn parse_options(attr: TokenStream) -> Result<Options, String> {
    let mut options = Options::default();

    for arg in split_args(attr) {
        let (key, value) = match arg.as_slice() {
            [TokenTree::Ident(key), TokenTree::Punct(eq), TokenTree::Literal(value)]
                if eq.as_char() == '=' =>
            {
                (key.to_string(), value.to_string())
            }
            _ => return Err("expected `key = literal`".to_string()),
        };

        match key.as_str() {
            "stack_size" => {
                let digits: String = value.chars().filter(|c| *c != '_').collect();
                match digits.parse::<usize>() {
                    Ok(bytes) if bytes > 0 => options.stack_size = Some(bytes),
                    _ => return Err(format!("invalid stack_size `{value}`")),
                }
            }
            "name" => match unquote(&value) {
                Some(name) => options.name = Some(name),
                None => return Err("name must be a plain string literal".to_string()),
            },
            other => return Err(format!("unknown option `{other}`")),
        }
    }

    Ok(options)
}

/// Strips the quotes of a plain string literal. Escapes are not supported.
fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;

    if inner.contains('\\') {
        return None;
    }

    Some(inner.to_string())
}

/// Returns the identifier following the `fn` keyword.
pub(crate) fn function_name(tokens: &[TokenTree]) -> Option<String> {
    tokens
        .windows(2)
        .find_map(|pair| match pair {
            [TokenTree::Ident(kw), TokenTree::Ident(name)] if kw.to_string() == "fn" => {
                Some(name.to_string())
            }
            _ => None,
        })
}

/// Emits a `compile_error!` with the given message.
pub(crate) fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});")
        .parse()
        .unwrap_or_default()
}
