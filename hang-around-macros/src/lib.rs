mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Runs `main` inside an await-capable context.
///
/// The body is moved onto a new context and the main thread blocks until
/// it returns, so `hang_around::await_future` may be used directly in
/// `main`. The return value, `Result` or otherwise, is passed through.
///
/// Accepts `stack_size = <bytes>` and `name = "<context name>"`.
///
/// ```rust,ignore
/// #[hang_around::main(stack_size = 131072)]
/// fn main() -> Result<(), hang_around::AwaitError> {
///     hang_around::await_future(hang_around::time::delay(Duration::from_millis(10)))?;
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = match utils::parse_options(attr) {
        Ok(options) => options,
        Err(msg) => return utils::compile_error(&msg),
    };

    wrap_body(item, options, false)
}

/// Marks a test whose body runs inside an await-capable context.
///
/// Equivalent to `#[test]` with the body moved onto a new context named
/// after the test. Panics and returned values propagate as in a plain test.
///
/// Accepts the same options as `#[hang_around::main]`.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = match utils::parse_options(attr) {
        Ok(options) => options,
        Err(msg) => return utils::compile_error(&msg),
    };

    wrap_body(item, options, true)
}

/// Replaces the function body with a `Builder::block_on` call running the
/// original body, optionally prefixing the function with `#[test]`.
fn wrap_body(item: TokenStream, mut options: utils::Options, as_test: bool) -> TokenStream {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    if tokens
        .iter()
        .any(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        return utils::compile_error("hang_around functions are synchronous; remove `async`");
    }

    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return utils::compile_error("expected a function body");
    };

    if as_test && options.name.is_none() {
        options.name = utils::function_name(&tokens);
    }

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let mut builder = String::from("::hang_around::Builder::new()");

    if let Some(name) = &options.name {
        builder.push_str(&format!(".name({name:?})"));
    }

    if let Some(bytes) = options.stack_size {
        builder.push_str(&format!(".stack_size({bytes})"));
    }

    let new_block = format!(
        "{{
            {builder}
                .block_on(move || {{
                    {block}
                }})
        }}"
    );

    let body = match new_block.parse() {
        Ok(body) => body,
        Err(err) => return utils::compile_error(&format!("hang_around macro error: {err}")),
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, body));

    let mut result: Vec<TokenTree> = Vec::new();

    if as_test {
        if let Ok(test_attr) = "#[test]".parse::<TokenStream>() {
            result.extend(test_attr);
        }
    }

    result.extend(tokens);
    result.into_iter().collect()
}
