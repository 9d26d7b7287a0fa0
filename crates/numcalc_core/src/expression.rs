//! Scalar expressions over named variables, compiled to a small stack VM.
//!
//! Host environments that cannot hand the engines a native function pointer
//! describe the integrand as text instead, e.g. `"x0^2 + sin(x1)"`. The text
//! is parsed once, compiled to [`Bytecode`] with variables resolved to slot
//! indices, and then evaluated per sample point without further allocation.

use crate::error::{CalcError, EvaluationError, Result};
use crate::traits::Callable;
use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::{E, PI};
use std::fmt;

/// Built-in functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
    Sinh,
    Cosh,
    Tanh,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        let function = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "exp" => Function::Exp,
            "ln" => Function::Ln,
            "log" => Function::Log10,
            "sqrt" => Function::Sqrt,
            "abs" => Function::Abs,
            "sinh" => Function::Sinh,
            "cosh" => Function::Cosh,
            "tanh" => Function::Tanh,
            _ => return None,
        };
        Some(function)
    }

    fn apply(self, a: f64) -> f64 {
        match self {
            Function::Sin => a.sin(),
            Function::Cos => a.cos(),
            Function::Tan => a.tan(),
            Function::Exp => a.exp(),
            Function::Ln => a.ln(),
            Function::Log10 => a.log10(),
            Function::Sqrt => a.sqrt(),
            Function::Abs => a.abs(),
            Function::Sinh => a.sinh(),
            Function::Cosh => a.cosh(),
            Function::Tanh => a.tanh(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Instructions of the stack machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpCode {
    LoadConst(f64),
    /// Pushes variable `idx` of the evaluation point.
    LoadVar(usize),
    /// Pops `b`, `a` and pushes `a op b`.
    Binary(BinaryOp),
    Neg,
    Call(Function),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    pub ops: Vec<OpCode>,
}

impl Bytecode {
    /// Deepest stack the program reaches, used to size the VM buffer once.
    pub fn max_stack_depth(&self) -> usize {
        let mut depth = 0usize;
        let mut max = 0usize;
        for op in &self.ops {
            match op {
                OpCode::LoadConst(_) | OpCode::LoadVar(_) => depth += 1,
                OpCode::Binary(_) => depth = depth.saturating_sub(1),
                OpCode::Neg | OpCode::Call(_) => {}
            }
            max = max.max(depth);
        }
        max
    }
}

fn malformed() -> CalcError {
    CalcError::InvalidConfiguration("malformed bytecode: stack underflow".to_string())
}

/// Stateless evaluator; the caller owns the stack buffer.
pub struct VM;

impl VM {
    pub fn execute(bytecode: &Bytecode, vars: &[f64], stack: &mut Vec<f64>) -> Result<f64> {
        stack.clear();

        for op in &bytecode.ops {
            match *op {
                OpCode::LoadConst(value) => stack.push(value),
                OpCode::LoadVar(idx) => {
                    let value = vars.get(idx).copied().ok_or(CalcError::IndexOutOfBounds {
                        index: idx,
                        limit: vars.len(),
                    })?;
                    stack.push(value);
                }
                OpCode::Binary(op) => {
                    let b = stack.pop().ok_or_else(malformed)?;
                    let a = stack.pop().ok_or_else(malformed)?;
                    stack.push(match op {
                        BinaryOp::Add => a + b,
                        BinaryOp::Sub => a - b,
                        BinaryOp::Mul => a * b,
                        BinaryOp::Div => a / b,
                        BinaryOp::Pow => a.powf(b),
                    });
                }
                OpCode::Neg => {
                    let a = stack.pop().ok_or_else(malformed)?;
                    stack.push(-a);
                }
                OpCode::Call(function) => {
                    let a = stack.pop().ok_or_else(malformed)?;
                    stack.push(function.apply(a));
                }
            }
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(value), true) => Ok(value),
            _ => Err(CalcError::InvalidConfiguration(
                "malformed bytecode: program must leave exactly one value".to_string(),
            )),
        }
    }
}

// --- AST & Parser ---

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    Neg(Box<Expr>),
    Call(String, Box<Expr>),
}

/// Resolves names to variable slots and emits bytecode.
pub struct Compiler {
    var_map: HashMap<String, usize>,
}

impl Compiler {
    pub fn new(var_names: &[String]) -> Self {
        let var_map = var_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { var_map }
    }

    pub fn compile(&self, expr: &Expr) -> Result<Bytecode> {
        let mut ops = Vec::new();
        self.compile_recursive(expr, &mut ops)?;
        Ok(Bytecode { ops })
    }

    fn compile_recursive(&self, expr: &Expr, ops: &mut Vec<OpCode>) -> Result<()> {
        match expr {
            Expr::Number(n) => ops.push(OpCode::LoadConst(*n)),
            Expr::Variable(name) => {
                // Variables shadow the named constants.
                if let Some(&idx) = self.var_map.get(name) {
                    ops.push(OpCode::LoadVar(idx));
                } else {
                    match name.as_str() {
                        "pi" => ops.push(OpCode::LoadConst(PI)),
                        "e" => ops.push(OpCode::LoadConst(E)),
                        _ => {
                            return Err(CalcError::Parse(format!("unknown variable '{name}'")))
                        }
                    }
                }
            }
            Expr::Binary(left, op, right) => {
                self.compile_recursive(left, ops)?;
                self.compile_recursive(right, ops)?;
                ops.push(OpCode::Binary(*op));
            }
            Expr::Neg(operand) => {
                self.compile_recursive(operand, ops)?;
                ops.push(OpCode::Neg);
            }
            Expr::Call(name, arg) => {
                let function = Function::from_name(name)
                    .ok_or_else(|| CalcError::Parse(format!("unknown function '{name}'")))?;
                self.compile_recursive(arg, ops)?;
                ops.push(OpCode::Call(function));
            }
        }
        Ok(())
    }
}

/// Parses an expression into an AST.
///
/// Precedence from loosest to tightest: `+ -`, `* /`, unary minus, `^`.
/// Exponentiation is right associative, so `-x^2^3` is `-(x^(2^3))`.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expression()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(CalcError::Parse(format!("unexpected trailing {token}"))),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Identifier(name) => write!(f, "identifier '{name}'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Caret => f.write_str("'^'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;

    while let Some(&c) = chars.get(pos) {
        if c.is_whitespace() {
            pos += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = pos;
            while chars.get(pos).map_or(false, |d| d.is_ascii_digit() || *d == '.') {
                pos += 1;
            }
            // An exponent needs at least one digit; otherwise the `e` starts
            // the next token.
            if matches!(chars.get(pos), Some('e') | Some('E')) {
                let mut look = pos + 1;
                if matches!(chars.get(look), Some('+') | Some('-')) {
                    look += 1;
                }
                if chars.get(look).map_or(false, char::is_ascii_digit) {
                    pos = look;
                    while chars.get(pos).map_or(false, char::is_ascii_digit) {
                        pos += 1;
                    }
                }
            }
            let literal: String = chars[start..pos].iter().collect();
            let value = literal
                .parse::<f64>()
                .map_err(|_| CalcError::Parse(format!("invalid number '{literal}'")))?;
            tokens.push(Token::Number(value));
        } else if c.is_alphabetic() || c == '_' {
            let start = pos;
            while chars.get(pos).map_or(false, |d| d.is_alphanumeric() || *d == '_') {
                pos += 1;
            }
            tokens.push(Token::Identifier(chars[start..pos].iter().collect()));
        } else {
            let token = match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '^' => Token::Caret,
                '(' => Token::LParen,
                ')' => Token::RParen,
                other => {
                    return Err(CalcError::Parse(format!(
                        "unexpected character '{other}' at offset {pos}"
                    )))
                }
            };
            tokens.push(token);
            pos += 1;
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_rparen(&mut self) -> Result<()> {
        match self.consume() {
            Some(Token::RParen) => Ok(()),
            Some(other) => Err(CalcError::Parse(format!("expected ')', found {other}"))),
            None => Err(CalcError::Parse("expected ')', found end of input".to_string())),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        let mut left = self.parse_product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.consume();
            let right = self.parse_product()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
    }

    fn parse_product(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.consume();
            let right = self.parse_unary()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.consume();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.consume();
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if let Some(Token::Caret) = self.peek() {
            self.consume();
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(Box::new(base), BinaryOp::Pow, Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.consume() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Identifier(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.consume();
                    let arg = self.parse_expression()?;
                    self.expect_rparen()?;
                    Ok(Expr::Call(name, Box::new(arg)))
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(Token::LParen) => {
                let expr = self.parse_expression()?;
                self.expect_rparen()?;
                Ok(expr)
            }
            Some(other) => Err(CalcError::Parse(format!("unexpected {other}"))),
            None => Err(CalcError::Parse("unexpected end of input".to_string())),
        }
    }
}

// --- ScalarExpression ---

/// A compiled expression of a fixed number of variables, usable anywhere a
/// [`Callable`] is.
pub struct ScalarExpression {
    source: String,
    bytecode: Bytecode,
    dimension: usize,
    // Scratch stack reused across calls; makes the expression !Sync.
    stack: RefCell<Vec<f64>>,
}

impl ScalarExpression {
    pub fn compile(text: &str, var_names: &[String]) -> Result<Self> {
        let expr = parse(text)?;
        let bytecode = Compiler::new(var_names).compile(&expr)?;
        let mut stack = Vec::new();
        stack.try_reserve_exact(bytecode.max_stack_depth())?;
        Ok(Self {
            source: text.to_string(),
            bytecode,
            dimension: var_names.len(),
            stack: RefCell::new(stack),
        })
    }

    /// Compiles `text` over the positional variables `x0, x1, ..., x{d-1}`.
    pub fn with_positional_vars(text: &str, dimension: usize) -> Result<Self> {
        let names: Vec<String> = (0..dimension).map(|i| format!("x{i}")).collect();
        Self::compile(text, &names)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }
}

impl fmt::Debug for ScalarExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarExpression")
            .field("source", &self.source)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl Callable for ScalarExpression {
    fn call(&self, x: &[f64]) -> std::result::Result<f64, EvaluationError> {
        if x.len() != self.dimension {
            return Err(EvaluationError::Raised(format!(
                "expression of {} variables evaluated at a point of length {}",
                self.dimension,
                x.len()
            )));
        }
        let mut stack = self.stack.borrow_mut();
        VM::execute(&self.bytecode, x, &mut stack)
            .map_err(|e| EvaluationError::Raised(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::RealFunction;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn eval(text: &str, vars: &[&str], point: &[f64]) -> f64 {
        let expr = ScalarExpression::compile(text, &names(vars)).expect("compile");
        expr.call(point).expect("evaluate")
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("1 + 2 * 3", &[], &[]), 7.0);
        assert_eq!(eval("(1 + 2) * 3", &[], &[]), 9.0);
        assert_eq!(eval("2 ^ 3 ^ 2", &[], &[]), 512.0);
        assert_eq!(eval("-x ^ 2", &["x"], &[3.0]), -9.0);
        assert_eq!(eval("8 / 4 / 2", &[], &[]), 1.0);
        assert_eq!(eval("2 ^ -1", &[], &[]), 0.5);
        assert_eq!(eval("--3 + +1", &[], &[]), 4.0);
    }

    #[test]
    fn scientific_literals_and_constants() {
        assert!((eval("1.5e3 + 2E-1", &[], &[]) - 1500.2).abs() < 1e-12);
        assert_eq!(eval("pi", &[], &[]), PI);
        assert_eq!(eval("e", &[], &[]), E);
        assert_eq!(eval("2*e", &[], &[]), 2.0 * E);
        // A variable named e takes precedence over the constant.
        assert_eq!(eval("e + 1", &["e"], &[4.0]), 5.0);
    }

    #[test]
    fn builtin_functions() {
        let x: f64 = 0.7;
        let cases: [(&str, f64); 11] = [
            ("sin(x)", x.sin()),
            ("cos(x)", x.cos()),
            ("tan(x)", x.tan()),
            ("exp(x)", x.exp()),
            ("ln(x)", x.ln()),
            ("log(x)", x.log10()),
            ("sqrt(x)", x.sqrt()),
            ("abs(-x)", x),
            ("sinh(x)", x.sinh()),
            ("cosh(x)", x.cosh()),
            ("tanh(x)", x.tanh()),
        ];
        for (text, expected) in cases {
            assert_eq!(eval(text, &["x"], &[x]), expected, "{text}");
        }
    }

    #[test]
    fn positional_variables() {
        let expr = ScalarExpression::with_positional_vars("x0^2 + 3*x1 - x2", 3).expect("compile");
        assert_eq!(expr.dimension(), 3);
        assert_eq!(expr.call(&[2.0, 1.0, 0.5]).unwrap(), 6.5);
    }

    #[test]
    fn parse_errors_are_typed() {
        for text in ["", "1 +", "(1 + 2", "1 2", "3 $ 4", "1.2.3", "sin(", ")"] {
            assert!(
                matches!(parse(text), Err(CalcError::Parse(_))),
                "expected parse error for {text:?}"
            );
        }
    }

    #[test]
    fn unknown_symbols_fail_at_compile_time() {
        let compiler = Compiler::new(&names(&["x"]));
        let unknown_var = parse("x + y").unwrap();
        assert!(matches!(compiler.compile(&unknown_var), Err(CalcError::Parse(_))));
        let unknown_fn = parse("gamma(x)").unwrap();
        assert!(matches!(compiler.compile(&unknown_fn), Err(CalcError::Parse(_))));
    }

    #[test]
    fn vm_rejects_malformed_programs() {
        let mut stack = Vec::new();
        let underflow = Bytecode {
            ops: vec![OpCode::LoadConst(1.0), OpCode::Binary(BinaryOp::Add)],
        };
        assert!(VM::execute(&underflow, &[], &mut stack).is_err());
        assert!(VM::execute(&Bytecode::default(), &[], &mut stack).is_err());
        let out_of_range = Bytecode {
            ops: vec![OpCode::LoadVar(2)],
        };
        assert_eq!(
            VM::execute(&out_of_range, &[1.0], &mut stack),
            Err(CalcError::IndexOutOfBounds { index: 2, limit: 1 })
        );
    }

    #[test]
    fn stack_depth_is_tracked() {
        let expr = parse("1 + 2 * (3 - 4)").unwrap();
        let bytecode = Compiler::new(&[]).compile(&expr).unwrap();
        assert_eq!(bytecode.max_stack_depth(), 4);
    }

    #[test]
    fn wrong_dimension_is_an_evaluation_error() {
        let expr = ScalarExpression::with_positional_vars("x0 + x1", 2).unwrap();
        assert!(matches!(expr.call(&[1.0]), Err(EvaluationError::Raised(_))));
    }

    #[test]
    fn expressions_plug_into_real_functions() {
        let expr = ScalarExpression::with_positional_vars("x0 * x1", 2).unwrap();
        let f = RealFunction::external(&expr);
        assert_eq!(f.evaluate(&[3.0, 4.0]).unwrap(), 12.0);
    }
}
