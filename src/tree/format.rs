use crate::tree::node::ProgramNode;

const INFIX: &[(&str, &str)] = &[
    ("Add", "+"),
    ("Sub", "-"),
    ("Mul", "*"),
    ("Div", "/"),
    ("Gt", ">"),
    ("Lt", "<"),
];

fn infix_op(symbol: &str) -> Option<&'static str> {
    INFIX
        .iter()
        .find(|(alias, _)| *alias == symbol)
        .map(|(_, op)| *op)
}

impl ProgramNode {
    /// Human-readable formula: infix for binary arithmetic/comparison,
    /// prefix call syntax for everything else.
    pub fn to_formula(&self) -> String {
        match self {
            ProgramNode::Const(value) => value.render(),
            ProgramNode::Variable(name) => name.clone(),
            ProgramNode::Argument(index) => format!("arg{}", index),
            ProgramNode::Call { symbol, args } => {
                if let (Some(op), 2) = (infix_op(symbol), args.len()) {
                    format!("({} {} {})", args[0].to_formula(), op, args[1].to_formula())
                } else {
                    format_call(symbol, args)
                }
            }
            ProgramNode::Invoke { name, args } => format_call(name, args),
            ProgramNode::Defun { name, body } => {
                format!("defun {} = {}", name, body.to_formula())
            }
            ProgramNode::Composite { symbol, args, .. } => format_call(symbol, args),
        }
    }

    /// Formula truncated to roughly `max_len` characters for progress output
    pub fn to_formula_short(&self, max_len: usize) -> String {
        let formula = self.to_formula();
        if formula.len() <= max_len {
            return formula;
        }
        let cut = formula
            .char_indices()
            .take_while(|(i, _)| *i < max_len.saturating_sub(3))
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &formula[..cut])
    }
}

fn format_call(name: &str, args: &[ProgramNode]) -> String {
    let rendered: Vec<String> = args.iter().map(|a| a.to_formula()).collect();
    format!("{}({})", name, rendered.join(", "))
}
