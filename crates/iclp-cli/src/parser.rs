//! A minimal hand-written recursive-descent parser for the line-oriented
//! declaration+constraint script the CLI accepts, e.g.
//! `X :: real(0, 10); { X*X == 2 };` (spec §12: "not a general Prolog
//! reader, that is explicitly out of scope"). Declarations and
//! constraint blocks are parsed into a small `Stmt` tree; expressions
//! become `iclp_compile::Expr` via ordinary precedence climbing.

use iclp_compile::Expr;
use iclp_core::{Bound, IntervalKind};

#[derive(Debug, Clone)]
pub enum Stmt {
    Declare { names: Vec<String>, kind: IntervalKind, lo: Bound, hi: Bound },
    Constraints(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Int(i64),
    Float(f64),
    Sym(&'static str),
    Eof,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Lexer<'a> {
        Lexer { chars: src.chars().peekable() }
    }

    fn tokens(mut self) -> Result<Vec<Tok>, String> {
        let mut out = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.chars.peek().copied() {
                None => {
                    out.push(Tok::Eof);
                    break;
                }
                Some(c) if c.is_ascii_digit() => out.push(self.lex_number()),
                Some(c) if c.is_alphabetic() || c == '_' => out.push(self.lex_ident()),
                Some(_) => out.push(self.lex_symbol()?),
            }
        }
        Ok(out)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
                self.chars.next();
            }
            if self.chars.peek() == Some(&'%') {
                while !matches!(self.chars.peek(), None | Some('\n')) {
                    self.chars.next();
                }
                continue;
            }
            break;
        }
    }

    fn lex_number(&mut self) -> Tok {
        let mut text = String::new();
        let mut is_float = false;
        while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.chars.next().unwrap());
        }
        if self.chars.peek() == Some(&'.') {
            is_float = true;
            text.push(self.chars.next().unwrap());
            while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.chars.next().unwrap());
            }
        }
        if matches!(self.chars.peek(), Some('e') | Some('E')) {
            is_float = true;
            text.push(self.chars.next().unwrap());
            if matches!(self.chars.peek(), Some('+') | Some('-')) {
                text.push(self.chars.next().unwrap());
            }
            while matches!(self.chars.peek(), Some(c) if c.is_ascii_digit()) {
                text.push(self.chars.next().unwrap());
            }
        }
        if is_float {
            Tok::Float(text.parse().unwrap_or(0.0))
        } else {
            Tok::Int(text.parse().unwrap_or(0))
        }
    }

    fn lex_ident(&mut self) -> Tok {
        let mut text = String::new();
        while matches!(self.chars.peek(), Some(c) if c.is_alphanumeric() || *c == '_') {
            text.push(self.chars.next().unwrap());
        }
        Tok::Ident(text)
    }

    fn lex_symbol(&mut self) -> Result<Tok, String> {
        let two: Option<String> = {
            let mut iter = self.chars.clone();
            let a = iter.next();
            let b = iter.next();
            match (a, b) {
                (Some(a), Some(b)) => Some(format!("{a}{b}")),
                _ => None,
            }
        };
        for sym in ["::", "**", "==", "!=", "<=", ">=", "&&", "||"] {
            if two.as_deref() == Some(sym) {
                self.chars.next();
                self.chars.next();
                return Ok(Tok::Sym(sym));
            }
        }
        let c = self.chars.next().ok_or("unexpected end of input")?;
        let sym = match c {
            '(' => "(",
            ')' => ")",
            '[' => "[",
            ']' => "]",
            '{' => "{",
            '}' => "}",
            ',' => ",",
            ';' => ";",
            '+' => "+",
            '-' => "-",
            '*' => "*",
            '/' => "/",
            '^' => "^",
            '<' => "<",
            '>' => ">",
            '!' => "!",
            _ => return Err(format!("unexpected character '{c}'")),
        };
        Ok(Tok::Sym(sym))
    }
}

pub struct Parser {
    toks: Vec<Tok>,
    pos: usize,
}

impl Parser {
    pub fn parse_script(src: &str) -> Result<Vec<Stmt>, String> {
        let toks = Lexer::new(src).tokens()?;
        let mut p = Parser { toks, pos: 0 };
        let mut stmts = Vec::new();
        while !p.at_eof() {
            stmts.push(p.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), Tok::Eof)
    }

    fn peek(&self) -> &Tok {
        &self.toks[self.pos]
    }

    fn advance(&mut self) -> Tok {
        let t = self.toks[self.pos].clone();
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
        t
    }

    fn expect_sym(&mut self, sym: &str) -> Result<(), String> {
        match self.advance() {
            Tok::Sym(s) if s == sym => Ok(()),
            other => Err(format!("expected '{sym}', found {other:?}")),
        }
    }

    fn expect_ident(&mut self) -> Result<String, String> {
        match self.advance() {
            Tok::Ident(name) => Ok(name),
            other => Err(format!("expected an identifier, found {other:?}")),
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, String> {
        let stmt = if matches!(self.peek(), Tok::Sym("{")) {
            self.parse_constraint_block()?
        } else {
            self.parse_declaration()?
        };
        self.expect_sym(";")?;
        Ok(stmt)
    }

    fn parse_declaration(&mut self) -> Result<Stmt, String> {
        let names = if matches!(self.peek(), Tok::Sym("[")) {
            self.advance();
            let mut names = vec![self.expect_ident()?];
            while matches!(self.peek(), Tok::Sym(",")) {
                self.advance();
                names.push(self.expect_ident()?);
            }
            self.expect_sym("]")?;
            names
        } else {
            vec![self.expect_ident()?]
        };
        self.expect_sym("::")?;
        let domain = self.expect_ident()?;
        let (kind, lo, hi) = match domain.as_str() {
            "boolean" => (IntervalKind::Integer, Bound::from_i64(0), Bound::from_i64(1)),
            "real" | "integer" | "int" => {
                let kind = if domain == "real" { IntervalKind::Real } else { IntervalKind::Integer };
                if matches!(self.peek(), Tok::Sym("(")) {
                    self.advance();
                    let lo = self.parse_bound()?;
                    self.expect_sym(",")?;
                    let hi = self.parse_bound()?;
                    self.expect_sym(")")?;
                    (kind, lo, hi)
                } else {
                    let default = 1.0e16;
                    (kind, Bound::from_f64(-default), Bound::from_f64(default))
                }
            }
            other => return Err(format!("unknown domain '{other}'")),
        };
        Ok(Stmt::Declare { names, kind, lo, hi })
    }

    fn parse_bound(&mut self) -> Result<Bound, String> {
        if let Tok::Ident(name) = self.peek() {
            if name == "_" {
                self.advance();
                return Ok(Bound::pos_inf());
            }
        }
        match self.parse_primary_number()? {
            Expr::IntConst(n) => Ok(Bound::from_i64(n)),
            Expr::RealConst(x) => Ok(Bound::from_f64(x)),
            _ => Err("expected a numeric bound".to_string()),
        }
    }

    fn parse_primary_number(&mut self) -> Result<Expr, String> {
        let neg = if matches!(self.peek(), Tok::Sym("-")) {
            self.advance();
            true
        } else {
            false
        };
        let e = match self.advance() {
            Tok::Int(n) => Expr::IntConst(if neg { -n } else { n }),
            Tok::Float(x) => Expr::RealConst(if neg { -x } else { x }),
            other => return Err(format!("expected a number, found {other:?}")),
        };
        Ok(e)
    }

    fn parse_constraint_block(&mut self) -> Result<Stmt, String> {
        self.expect_sym("{")?;
        let mut exprs = vec![self.parse_expr()?];
        while matches!(self.peek(), Tok::Sym(",")) {
            self.advance();
            exprs.push(self.parse_expr()?);
        }
        self.expect_sym("}")?;
        Ok(Stmt::Constraints(exprs))
    }

    // Precedence, low to high: or/xor/nand/nor/imply < and < relational < additive < multiplicative < power < unary < primary.
    fn parse_expr(&mut self) -> Result<Expr, String> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_and()?;
        loop {
            match self.peek() {
                Tok::Sym("||") => {
                    self.advance();
                    lhs = Expr::Or(Box::new(lhs), Box::new(self.parse_and()?));
                }
                Tok::Ident(name) if name == "xor" => {
                    self.advance();
                    lhs = Expr::Xor(Box::new(lhs), Box::new(self.parse_and()?));
                }
                Tok::Ident(name) if name == "imply" => {
                    self.advance();
                    lhs = Expr::Imply(Box::new(lhs), Box::new(self.parse_and()?));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_relational()?;
        while matches!(self.peek(), Tok::Sym("&&")) {
            self.advance();
            lhs = lhs.and(self.parse_relational()?);
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self) -> Result<Expr, String> {
        let lhs = self.parse_additive()?;
        let op = match self.peek() {
            Tok::Sym("==") => Some("=="),
            Tok::Sym("!=") => Some("!="),
            Tok::Sym("<=") => Some("<="),
            Tok::Sym(">=") => Some(">="),
            Tok::Sym("<") => Some("<"),
            Tok::Sym(">") => Some(">"),
            _ => None,
        };
        let Some(op) = op else { return Ok(lhs) };
        self.advance();
        let rhs = self.parse_additive()?;
        Ok(match op {
            "==" => lhs.eq(rhs),
            "!=" => Expr::Ne(Box::new(lhs), Box::new(rhs)),
            "<=" => lhs.le(rhs),
            "<" => lhs.lt(rhs),
            // a > b  ==  b < a ; a >= b == b <= a
            ">" => rhs.lt(lhs),
            ">=" => rhs.le(lhs),
            _ => unreachable!(),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            match self.peek() {
                Tok::Sym("+") => {
                    self.advance();
                    lhs = lhs.add(self.parse_multiplicative()?);
                }
                Tok::Sym("-") => {
                    self.advance();
                    lhs = lhs.sub(self.parse_multiplicative()?);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_power()?;
        loop {
            match self.peek() {
                Tok::Sym("*") => {
                    self.advance();
                    lhs = lhs.mul(self.parse_power()?);
                }
                Tok::Sym("/") => {
                    self.advance();
                    lhs = lhs.div(self.parse_power()?);
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_unary()?;
        if matches!(self.peek(), Tok::Sym("^") | Tok::Sym("**")) {
            self.advance();
            // Right-associative: X^Y^Z == X^(Y^Z).
            let exponent = self.parse_power()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Tok::Sym("-") => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Tok::Sym("!") => {
                self.advance();
                Ok(Expr::Not(Box::new(self.parse_unary()?)))
            }
            Tok::Ident(name) if name == "not" => {
                self.advance();
                Ok(Expr::Not(Box::new(self.parse_unary()?)))
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Tok::Int(n) => Ok(Expr::IntConst(n)),
            Tok::Float(x) => Ok(Expr::RealConst(x)),
            Tok::Sym("(") => {
                let e = self.parse_expr()?;
                self.expect_sym(")")?;
                Ok(e)
            }
            Tok::Ident(name) => self.parse_ident_or_call(name),
            other => Err(format!("unexpected token {other:?}")),
        }
    }

    fn parse_ident_or_call(&mut self, name: String) -> Result<Expr, String> {
        if !matches!(self.peek(), Tok::Sym("(")) {
            return Ok(Expr::var(&name));
        }
        self.advance();
        let mut args = vec![self.parse_expr()?];
        while matches!(self.peek(), Tok::Sym(",")) {
            self.advance();
            args.push(self.parse_expr()?);
        }
        self.expect_sym(")")?;
        let mut args = args.into_iter();
        let unary = |f: fn(Box<Expr>) -> Expr, mut args: std::vec::IntoIter<Expr>| -> Result<Expr, String> {
            let a = args.next().ok_or("expected one argument")?;
            Ok(f(Box::new(a)))
        };
        match name.as_str() {
            "sqrt" => unary(Expr::Sqrt, args),
            "abs" => unary(Expr::Abs, args),
            "exp" => unary(Expr::Exp, args),
            "log" => unary(Expr::Log, args),
            "sin" => unary(Expr::Sin, args),
            "cos" => unary(Expr::Cos, args),
            "tan" => unary(Expr::Tan, args),
            "min" | "max" => {
                let a = args.next().ok_or("expected two arguments")?;
                let b = args.next().ok_or("expected two arguments")?;
                Ok(if name == "min" { Expr::Min(Box::new(a), Box::new(b)) } else { Expr::Max(Box::new(a), Box::new(b)) })
            }
            other => Err(format!("unknown function '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_real_declaration_with_bounds() {
        let stmts = Parser::parse_script("X :: real(0, 10);").unwrap();
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Stmt::Declare { names, kind, lo, hi } => {
                assert_eq!(names, &vec!["X".to_string()]);
                assert_eq!(*kind, IntervalKind::Real);
                assert_eq!(lo.to_f64(false), 0.0);
                assert_eq!(hi.to_f64(true), 10.0);
            }
            _ => panic!("expected a declaration"),
        }
    }

    #[test]
    fn test_parse_list_declaration_and_constraint_block() {
        let stmts = Parser::parse_script("[X, Y] :: integer(0, 5); { X + Y == 5 };").unwrap();
        assert_eq!(stmts.len(), 2);
        match &stmts[0] {
            Stmt::Declare { names, .. } => assert_eq!(names, &vec!["X".to_string(), "Y".to_string()]),
            _ => panic!("expected a declaration"),
        }
        match &stmts[1] {
            Stmt::Constraints(exprs) => assert_eq!(exprs.len(), 1),
            _ => panic!("expected a constraint block"),
        }
    }

    #[test]
    fn test_parse_unbounded_domain_with_underscore() {
        let stmts = Parser::parse_script("A :: integer(0, _);").unwrap();
        match &stmts[0] {
            Stmt::Declare { hi, .. } => assert!(hi.is_infinite()),
            _ => panic!("expected a declaration"),
        }
    }

    #[test]
    fn test_parse_comparison_and_power() {
        let stmts = Parser::parse_script("{ X^4 - 4*X**3 + 4*X^2 - 4*X + 3 == 0 };").unwrap();
        match &stmts[0] {
            Stmt::Constraints(exprs) => assert_eq!(exprs.len(), 1),
            _ => panic!("expected a constraint block"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_function() {
        let err = Parser::parse_script("{ bogus(X) == 1 };");
        assert!(err.is_err());
    }
}
