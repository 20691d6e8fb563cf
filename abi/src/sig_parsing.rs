use crate::types::{AbiError, AbiResult, ParamType};

use self::type_lexer::Token;

mod type_lexer {
    use logos::{Lexer, Logos};

    #[derive(Logos, Debug, Clone, PartialEq)]
    pub(super) enum Token {
        #[regex("byte|bytes[1-2][0-9]?|bytes3[0-2]?|bytes[4-9]", fixed_bytes_size)]
        FixedBytes(u8),
        #[regex("uint(8|16|24|32|40|48|56|64|72|80|88|96|104|112|120|128|136|144|152|160|168|176|184|192|200|208|216|224|232|240|248|256)?", |lex| fixed_int_bits(lex, "uint"))]
        Uint(usize),
        #[regex("int(8|16|24|32|40|48|56|64|72|80|88|96|104|112|120|128|136|144|152|160|168|176|184|192|200|208|216|224|232|240|248|256)?", |lex| fixed_int_bits(lex, "int"))]
        Int(usize),
        #[regex("bool")]
        Bool,
        #[regex("address")]
        Address,
        #[regex("bytes")]
        Bytes,
        #[regex("string")]
        String,
        #[regex("\\[[0-9]*\\]", reference_type_size)]
        ReferenceType(Option<u64>),
        #[regex("[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
        Identifier(std::string::String),
        #[token("(")]
        OpenParen,
        #[token(")")]
        CloseParen,
        #[token(",")]
        Comma,

        #[error]
        #[regex(r"[ \t\r\n]+", logos::skip)]
        Error,
    }

    fn fixed_bytes_size(lex: &mut Lexer<Token>) -> u8 {
        let slice = lex.slice();

        if slice == "byte" {
            return 1;
        }

        let n = slice["bytes".len()..].parse();
        n.ok().unwrap_or(1)
    }

    fn fixed_int_bits(lex: &mut Lexer<Token>, prefix: &str) -> usize {
        let slice = lex.slice();

        if slice == prefix {
            // bare uint/int means the full 256-bit width
            return 256;
        }

        let n = slice[prefix.len()..].parse();
        n.unwrap_or(256)
    }

    fn reference_type_size(lex: &mut Lexer<Token>) -> Option<u64> {
        let slice = lex.slice();

        if slice == "[]" {
            return None;
        }

        let end_index = slice.len() - 1;
        let n = slice[1..end_index].parse();
        n.ok()
    }
}

/// A parsed evm function definition: the name and the ordered argument types.
/// Return-type groups are accepted after the argument group and discarded.
#[derive(Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<ParamType>,
}

struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    fn lex(text: &str) -> AbiResult<Self> {
        use logos::Logos;

        let mut lexer = Token::lexer(text);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next() {
            if token == Token::Error {
                return Err(AbiError::UnexpectedCharacter(lexer.slice().to_string()));
            }
            tokens.push(token);
        }
        Ok(TokenStream { tokens, pos: 0 })
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }
}

/// Parse `name(type,...)` with arbitrarily nested tuple and array types.
pub fn parse_signature(signature: &str) -> AbiResult<Function> {
    let mut stream = TokenStream::lex(signature)?;
    let name = match stream.next() {
        Some(Token::Identifier(name)) => name,
        _ => return Err(AbiError::InvalidSignature),
    };
    match stream.next() {
        Some(Token::OpenParen) => {}
        _ => return Err(AbiError::InvalidParenthesis),
    }
    let params = parse_params(&mut stream)?;
    if let Some(Token::OpenParen) = stream.peek() {
        stream.next();
        // a trailing return group is allowed but carries no encoding information
        parse_params(&mut stream)?;
    }
    match stream.next() {
        None => Ok(Function { name, params }),
        Some(Token::CloseParen) => Err(AbiError::InvalidParenthesis),
        Some(_) => Err(AbiError::InvalidSignature),
    }
}

/// Parse a `,`-separated type list up to and including the closing `)`.
/// The opening `(` must already be consumed.
fn parse_params(stream: &mut TokenStream) -> AbiResult<Vec<ParamType>> {
    let mut params = Vec::new();
    if let Some(Token::CloseParen) = stream.peek() {
        stream.next();
        return Ok(params);
    }
    loop {
        params.push(parse_type(stream)?);
        match stream.next() {
            Some(Token::Comma) => {}
            Some(Token::CloseParen) => break,
            Some(_) => return Err(AbiError::InvalidSignature),
            None => return Err(AbiError::InvalidParenthesis),
        }
    }
    Ok(params)
}

fn parse_type(stream: &mut TokenStream) -> AbiResult<ParamType> {
    let mut ty = match stream.next() {
        Some(Token::Uint(bits)) => ParamType::Uint(bits),
        Some(Token::Int(bits)) => ParamType::Int(bits),
        Some(Token::Bool) => ParamType::Bool,
        Some(Token::Address) => ParamType::Address,
        Some(Token::Bytes) => ParamType::Bytes,
        Some(Token::String) => ParamType::String,
        Some(Token::FixedBytes(size)) => ParamType::FixedBytes(size as usize),
        Some(Token::OpenParen) => ParamType::Tuple(parse_params(stream)?),
        Some(Token::Identifier(name)) => return Err(AbiError::UnknownType(name)),
        Some(_) => return Err(AbiError::InvalidSignature),
        None => return Err(AbiError::InvalidParenthesis),
    };
    // suffixes bind left to right: uint256[3][] is a dynamic array of uint256[3]
    while let Some(Token::ReferenceType(_)) = stream.peek() {
        if let Some(Token::ReferenceType(length)) = stream.next() {
            ty = ParamType::Array {
                length,
                inner: Box::new(ty),
            };
        }
    }
    Ok(ty)
}

/// Strip every whitespace character and anything past the argument group, so
/// that differently spelled signatures hash to the same selector.
pub fn canonical_signature(signature: &str) -> AbiResult<String> {
    let stripped: String = signature
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let mut depth = 0u32;
    let mut args_end = None;
    for (i, c) in stripped.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Err(AbiError::InvalidParenthesis);
                }
                depth -= 1;
                if depth == 0 && args_end.is_none() {
                    args_end = Some(i);
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(AbiError::InvalidParenthesis);
    }
    match args_end {
        Some(end) => Ok(stripped[..=end].to_string()),
        None => Err(AbiError::InvalidParenthesis),
    }
}
