use super::escape::emit_string_literal_double_quoted;
use super::precedence::callee_contains_call;
use super::precedence::child_min_prec_for_binary;
use super::precedence::expr_prec;
use super::precedence::is_logical_and_or;
use super::precedence::is_nullish;
use super::precedence::needs_parens;
use super::precedence::requires_trailing_dot;
use super::precedence::starts_with_brace;
use super::precedence::Prec;
use super::precedence::Side;
use super::precedence::ASSIGNMENT_PRECEDENCE;
use super::precedence::CALL_MEMBER_PRECEDENCE;
use super::precedence::NEW_WITHOUT_ARGS_PRECEDENCE;
use super::EmitResult;
use super::JsEmitter;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::jsx::JsxAttr;
use crate::ast::expr::jsx::JsxAttrVal;
use crate::ast::expr::jsx::JsxElem;
use crate::ast::expr::jsx::JsxElemChild;
use crate::ast::expr::jsx::JsxElemName;
use crate::ast::expr::jsx::JsxExprContainer;
use crate::ast::expr::jsx::JsxName;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::Expr;
use crate::ast::expr::NewExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::operator::OperatorName;
use crate::token::TT;
use std::fmt;

impl<'a, W: fmt::Write> JsEmitter<'a, W> {
  pub fn emit_expr(&mut self, expr: &Node<Expr>) -> EmitResult {
    self.emit_expr_with_min_prec(expr, Prec::LOWEST)
  }

  pub(super) fn emit_expr_with_min_prec(&mut self, expr: &Node<Expr>, min_prec: Prec) -> EmitResult {
    // Inserted nodes have empty locations and carry no comments.
    if !expr.loc.is_empty() {
      self.emit_comments_before(expr.loc.0, true)?;
    };
    let wrap = needs_parens(expr_prec(expr), min_prec);
    if wrap {
      self.out.write_char('(')?;
    };
    self.emit_expr_no_parens(expr)?;
    if wrap {
      self.out.write_char(')')?;
    };
    Ok(())
  }

  pub(super) fn emit_wrapped(&mut self, expr: &Node<Expr>) -> EmitResult {
    self.out.write_char('(')?;
    self.emit_expr(expr)?;
    self.out.write_char(')')
  }

  fn emit_expr_no_parens(&mut self, expr: &Node<Expr>) -> EmitResult {
    match expr.stx.as_ref() {
      Expr::Id(id) => self.out.write_str(&id.stx.name),
      Expr::IdPat(id) => self.out.write_str(&id.stx.name),
      Expr::This(_) => self.out.write_str("this"),
      Expr::Super(_) => self.out.write_str("super"),
      Expr::NewTarget(_) => self.out.write_str("new.target"),
      Expr::ImportMeta(_) => self.out.write_str("import.meta"),
      Expr::LitNum(num) => write!(self.out, "{}", num.stx.value),
      Expr::LitBigInt(lit) => self.out.write_str(&lit.stx.value),
      Expr::LitBool(lit) => self.out.write_str(if lit.stx.value { "true" } else { "false" }),
      Expr::LitNull(_) => self.out.write_str("null"),
      Expr::LitRegex(lit) => self.out.write_str(&lit.stx.value),
      Expr::LitStr(lit) => emit_string_literal_double_quoted(&mut *self.out, &lit.stx.value),
      Expr::LitTemplate(lit) => self.emit_template_literal(&lit.stx.parts),
      Expr::LitArr(arr) => self.emit_lit_arr(&arr.stx.elements),
      Expr::LitObj(obj) => self.emit_lit_obj(&obj.stx.members),
      Expr::ArrPat(arr) => self.emit_arr_pat(arr),
      Expr::ObjPat(obj) => self.emit_obj_pat(obj),
      Expr::JsxElem(elem) => self.emit_jsx_elem(elem),
      Expr::Func(func) => {
        self.emit_func_prefix(&func.stx.func)?;
        self.emit_func_name(func.stx.name.as_ref())?;
        self.emit_func_params_and_body(&func.stx.func)
      }
      Expr::Class(class) => self.emit_class(
        class.stx.name.as_ref(),
        class.stx.extends.as_ref(),
        &class.stx.members,
      ),
      Expr::ArrowFunc(arrow) => self.emit_arrow_func(arrow),
      Expr::Import(import) => {
        self.out.write_str("import(")?;
        self.emit_expr_with_min_prec(&import.stx.module, ASSIGNMENT_PRECEDENCE)?;
        self.out.write_char(')')
      }
      Expr::Unary(unary) => self.emit_unary(unary),
      Expr::UnaryPostfix(unary) => {
        self.emit_expr_with_min_prec(&unary.stx.argument, Prec::of(unary.stx.operator))?;
        self.out.write_str(match unary.stx.operator {
          OperatorName::PostfixDecrement => "--",
          _ => "++",
        })
      }
      Expr::Binary(binary) => self.emit_binary(binary),
      Expr::Cond(cond) => {
        let prec = Prec::of(OperatorName::Conditional);
        self.emit_expr_with_min_prec(&cond.stx.test, prec.tighter())?;
        self.out.write_str(" ? ")?;
        self.emit_expr_with_min_prec(&cond.stx.consequent, ASSIGNMENT_PRECEDENCE)?;
        self.out.write_str(" : ")?;
        self.emit_expr_with_min_prec(&cond.stx.alternate, ASSIGNMENT_PRECEDENCE)
      }
      Expr::Yield(yield_) => {
        self.out.write_str("yield")?;
        if yield_.stx.delegate {
          self.out.write_char('*')?;
        };
        if let Some(argument) = &yield_.stx.argument {
          self.out.write_char(' ')?;
          self.emit_expr_with_min_prec(argument, ASSIGNMENT_PRECEDENCE)?;
        };
        Ok(())
      }
      Expr::New(new) => self.emit_new(new),
      Expr::Call(call) => {
        self.emit_expr_with_min_prec(&call.stx.callee, CALL_MEMBER_PRECEDENCE)?;
        if call.stx.optional_chaining {
          self.out.write_str("?.")?;
        };
        self.emit_call_args(&call.stx.arguments)
      }
      Expr::Member(member) => {
        let left = &member.stx.left;
        match left.stx.as_ref() {
          Expr::LitNum(num) if !member.stx.optional_chaining => {
            let rendered = num.stx.value.to_string();
            self.out.write_str(&rendered)?;
            if requires_trailing_dot(&rendered) {
              self.out.write_char('.')?;
            };
          }
          _ => self.emit_expr_with_min_prec(left, CALL_MEMBER_PRECEDENCE)?,
        };
        self.out.write_str(if member.stx.optional_chaining { "?." } else { "." })?;
        self.out.write_str(&member.stx.right)
      }
      Expr::ComputedMember(member) => {
        self.emit_expr_with_min_prec(&member.stx.object, CALL_MEMBER_PRECEDENCE)?;
        self.out.write_str(if member.stx.optional_chaining { "?.[" } else { "[" })?;
        self.emit_expr(&member.stx.member)?;
        self.out.write_char(']')
      }
      Expr::TaggedTemplate(tagged) => {
        self.emit_expr_with_min_prec(&tagged.stx.function, CALL_MEMBER_PRECEDENCE)?;
        self.emit_template_literal(&tagged.stx.parts)
      }
    }
  }

  fn emit_template_literal(&mut self, parts: &[LitTemplatePart]) -> EmitResult {
    self.out.write_char('`')?;
    for part in parts {
      match part {
        LitTemplatePart::String(raw) => self.out.write_str(raw)?,
        LitTemplatePart::Substitution(expr) => {
          self.out.write_str("${")?;
          self.emit_expr(expr)?;
          self.out.write_char('}')?;
        }
      };
    }
    self.out.write_char('`')
  }

  fn emit_call_args(&mut self, args: &[Node<CallArg>]) -> EmitResult {
    self.out.write_char('(')?;
    for (i, arg) in args.iter().enumerate() {
      if i > 0 {
        self.out.write_str(", ")?;
      };
      if arg.stx.spread {
        self.out.write_str("...")?;
      };
      self.emit_expr_with_min_prec(&arg.stx.value, ASSIGNMENT_PRECEDENCE)?;
    }
    self.out.write_char(')')
  }

  fn emit_new(&mut self, new: &Node<NewExpr>) -> EmitResult {
    self.out.write_str("new ")?;
    let callee = &new.stx.callee;
    if callee_contains_call(callee) {
      self.emit_wrapped(callee)?;
    } else {
      self.emit_expr_with_min_prec(callee, CALL_MEMBER_PRECEDENCE)?;
    };
    match &new.stx.arguments {
      Some(args) => self.emit_call_args(args),
      None => Ok(()),
    }
  }

  fn emit_unary(&mut self, unary: &Node<UnaryExpr>) -> EmitResult {
    let operator = unary.stx.operator;
    let argument = &unary.stx.argument;
    let syntax = match operator {
      OperatorName::Await => "await",
      OperatorName::BitwiseNot => "~",
      OperatorName::Delete => "delete",
      OperatorName::LogicalNot => "!",
      OperatorName::PrefixDecrement => "--",
      OperatorName::PrefixIncrement => "++",
      OperatorName::Typeof => "typeof",
      OperatorName::UnaryNegation => "-",
      OperatorName::UnaryPlus => "+",
      OperatorName::Void => "void",
      // Not produced by the parser as a unary operator.
      _ => operator.syntax().unwrap_or_default(),
    };
    self.out.write_str(syntax)?;
    let is_word = syntax.bytes().all(|b| b.is_ascii_alphabetic());
    // `- -x` and `+ +x` must not merge into a decrement or increment.
    let would_merge = match argument.stx.as_ref() {
      Expr::Unary(inner) => matches!(
        (syntax, inner.stx.operator),
        ("-", OperatorName::UnaryNegation | OperatorName::PrefixDecrement)
          | ("+", OperatorName::UnaryPlus | OperatorName::PrefixIncrement)
      ),
      _ => false,
    };
    if is_word || would_merge {
      self.out.write_char(' ')?;
    };
    self.emit_expr_with_min_prec(argument, Prec::of(operator))
  }

  fn emit_binary(&mut self, binary: &Node<BinaryExpr>) -> EmitResult {
    let operator = binary.stx.operator;
    let left = &binary.stx.left;
    let right = &binary.stx.right;

    // `??` cannot be mixed with `||` or `&&` without parentheses.
    let mixes_nullish = |operand: &Node<Expr>| match operator {
      OperatorName::NullishCoalescing => is_logical_and_or(operand),
      OperatorName::LogicalAnd | OperatorName::LogicalOr => is_nullish(operand),
      _ => false,
    };
    let force_left = mixes_nullish(left)
      || (operator == OperatorName::Exponentiation
        && matches!(left.stx.as_ref(), Expr::Unary(_)));
    let force_right = mixes_nullish(right);

    if force_left {
      self.emit_wrapped(left)?;
    } else {
      self.emit_expr_with_min_prec(left, child_min_prec_for_binary(operator, Side::Left))?;
    };
    match operator {
      OperatorName::Comma => self.out.write_str(", ")?,
      _ => write!(self.out, " {} ", operator.syntax().unwrap_or_default())?,
    };
    if force_right {
      self.emit_wrapped(right)
    } else {
      self.emit_expr_with_min_prec(right, child_min_prec_for_binary(operator, Side::Right))
    }
  }

  fn emit_arrow_func(&mut self, arrow: &Node<ArrowFuncExpr>) -> EmitResult {
    let func = &arrow.stx.func;
    if func.stx.async_ {
      self.out.write_str("async ")?;
    };
    self.emit_params(&func.stx.parameters)?;
    self.out.write_str(" => ")?;
    match &func.stx.body {
      FuncBody::Block(body) => self.emit_block_body(body),
      FuncBody::Expression(expr) if starts_with_brace(expr) => self.emit_wrapped(expr),
      FuncBody::Expression(expr) => self.emit_expr_with_min_prec(expr, ASSIGNMENT_PRECEDENCE),
    }
  }

  /// Writes `async function* ` or the applicable subset.
  pub(super) fn emit_func_prefix(&mut self, func: &Node<Func>) -> EmitResult {
    if func.stx.async_ {
      self.out.write_str("async ")?;
    };
    self.out.write_str("function")?;
    if func.stx.generator {
      self.out.write_char('*')?;
    };
    Ok(())
  }

  pub(super) fn emit_func_name(&mut self, name: Option<&Node<ClassOrFuncName>>) -> EmitResult {
    if let Some(name) = name {
      self.out.write_char(' ')?;
      self.out.write_str(&name.stx.name)?;
    };
    Ok(())
  }

  pub(super) fn emit_params(&mut self, params: &[Node<ParamDecl>]) -> EmitResult {
    self.out.write_char('(')?;
    for (i, param) in params.iter().enumerate() {
      if i > 0 {
        self.out.write_str(", ")?;
      };
      if param.stx.rest {
        self.out.write_str("...")?;
      };
      self.emit_pat(&param.stx.pattern.stx.pat)?;
      self.emit_default_value(param.stx.default_value.as_ref())?;
    }
    self.out.write_char(')')
  }

  pub(super) fn emit_func_params_and_body(&mut self, func: &Node<Func>) -> EmitResult {
    self.emit_params(&func.stx.parameters)?;
    self.out.write_char(' ')?;
    match &func.stx.body {
      FuncBody::Block(body) => self.emit_block_body(body),
      // Only arrow functions have expression bodies.
      FuncBody::Expression(expr) => {
        self.out.write_str("{ return ")?;
        self.emit_expr(expr)?;
        self.out.write_str("; }")
      }
    }
  }

  fn emit_default_value(&mut self, value: Option<&Node<Expr>>) -> EmitResult {
    if let Some(value) = value {
      self.out.write_str(" = ")?;
      self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
    };
    Ok(())
  }

  pub(super) fn emit_class(
    &mut self,
    name: Option<&Node<ClassOrFuncName>>,
    extends: Option<&Node<Expr>>,
    members: &[Node<ClassMember>],
  ) -> EmitResult {
    self.out.write_str("class")?;
    self.emit_func_name(name)?;
    if let Some(extends) = extends {
      self.out.write_str(" extends ")?;
      self.emit_expr_with_min_prec(extends, NEW_WITHOUT_ARGS_PRECEDENCE)?;
    };
    self.out.write_str(" {")?;
    if members.is_empty() {
      return self.out.write_char('}');
    };
    self.indent += 1;
    for member in members {
      self.newline()?;
      if member.stx.static_ {
        self.out.write_str("static ")?;
      };
      match &member.stx.val {
        ClassOrObjVal::Prop(value) => {
          self.emit_key(&member.stx.key)?;
          self.emit_default_value(value.as_ref())?;
          self.out.write_char(';')?;
        }
        ClassOrObjVal::StaticBlock(block) => self.emit_block_body(&block.stx.body)?,
        val => self.emit_method_like(&member.stx.key, val)?,
      };
    }
    self.indent -= 1;
    self.newline()?;
    self.out.write_char('}')
  }

  pub(super) fn emit_key(&mut self, key: &ClassOrObjKey) -> EmitResult {
    match key {
      ClassOrObjKey::Computed(expr) => {
        self.out.write_char('[')?;
        self.emit_expr_with_min_prec(expr, ASSIGNMENT_PRECEDENCE)?;
        self.out.write_char(']')
      }
      ClassOrObjKey::Direct(direct) => match direct.stx.tt {
        TT::Str => emit_string_literal_double_quoted(&mut *self.out, &direct.stx.key),
        _ => self.out.write_str(&direct.stx.key),
      },
    }
  }

  /// Writes a getter, setter, or method, starting with its key. Props are handled by the caller.
  fn emit_method_like(&mut self, key: &ClassOrObjKey, val: &ClassOrObjVal) -> EmitResult {
    let func = match val {
      ClassOrObjVal::Getter(getter) => {
        self.out.write_str("get ")?;
        &getter.stx.func
      }
      ClassOrObjVal::Setter(setter) => {
        self.out.write_str("set ")?;
        &setter.stx.func
      }
      ClassOrObjVal::Method(method) => {
        if method.stx.func.stx.async_ {
          self.out.write_str("async ")?;
        };
        if method.stx.func.stx.generator {
          self.out.write_char('*')?;
        };
        &method.stx.func
      }
      ClassOrObjVal::Prop(_) | ClassOrObjVal::StaticBlock(_) => return Ok(()),
    };
    self.emit_key(key)?;
    self.emit_func_params_and_body(func)
  }

  fn emit_lit_arr(&mut self, elements: &[LitArrElem]) -> EmitResult {
    self.out.write_char('[')?;
    for (i, elem) in elements.iter().enumerate() {
      if i > 0 {
        self.out.write_str(", ")?;
      };
      match elem {
        LitArrElem::Single(value) => self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?,
        LitArrElem::Rest(value) => {
          self.out.write_str("...")?;
          self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
        }
        LitArrElem::Empty => {}
      };
    }
    // A trailing hole needs its own comma.
    if matches!(elements.last(), Some(LitArrElem::Empty)) {
      self.out.write_char(',')?;
    };
    self.out.write_char(']')
  }

  fn emit_lit_obj(&mut self, members: &[Node<ObjMember>]) -> EmitResult {
    self.out.write_char('{')?;
    for (i, member) in members.iter().enumerate() {
      if i > 0 {
        self.out.write_str(", ")?;
      };
      match &member.stx.typ {
        ObjMemberType::Valued {
          key,
          val: ClassOrObjVal::Prop(value),
        } => {
          self.emit_key(key)?;
          if let Some(value) = value {
            self.out.write_str(": ")?;
            self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
          };
        }
        ObjMemberType::Valued { key, val } => self.emit_method_like(key, val)?,
        ObjMemberType::Shorthand { id } => self.out.write_str(&id.stx.name)?,
        ObjMemberType::Rest { val } => {
          self.out.write_str("...")?;
          self.emit_expr_with_min_prec(val, ASSIGNMENT_PRECEDENCE)?;
        }
      };
    }
    self.out.write_char('}')
  }

  pub(super) fn emit_pat(&mut self, pat: &Node<Pat>) -> EmitResult {
    match pat.stx.as_ref() {
      Pat::Id(id) => self.out.write_str(&id.stx.name),
      Pat::Arr(arr) => self.emit_arr_pat(arr),
      Pat::Obj(obj) => self.emit_obj_pat(obj),
    }
  }

  fn emit_arr_pat(&mut self, arr: &Node<ArrPat>) -> EmitResult {
    self.out.write_char('[')?;
    let elements = &arr.stx.elements;
    for (i, elem) in elements.iter().enumerate() {
      if i > 0 {
        self.out.write_str(", ")?;
      };
      if let Some(elem) = elem {
        self.emit_pat(&elem.target)?;
        self.emit_default_value(elem.default_value.as_ref())?;
      };
    }
    match &arr.stx.rest {
      Some(rest) => {
        if !elements.is_empty() {
          self.out.write_str(", ")?;
        };
        self.out.write_str("...")?;
        self.emit_pat(rest)?;
      }
      None if matches!(elements.last(), Some(None)) => self.out.write_char(',')?,
      None => {}
    };
    self.out.write_char(']')
  }

  fn emit_obj_pat(&mut self, obj: &Node<ObjPat>) -> EmitResult {
    self.out.write_char('{')?;
    let properties = &obj.stx.properties;
    for (i, prop) in properties.iter().enumerate() {
      if i > 0 {
        self.out.write_str(", ")?;
      };
      let is_shorthand = match (&prop.stx.key, prop.stx.target.stx.as_ref()) {
        (ClassOrObjKey::Direct(key), Pat::Id(id)) => {
          key.stx.tt != TT::Str && key.stx.key == id.stx.name
        }
        _ => false,
      };
      if !is_shorthand {
        self.emit_key(&prop.stx.key)?;
        self.out.write_str(": ")?;
      };
      self.emit_pat(&prop.stx.target)?;
      self.emit_default_value(prop.stx.default_value.as_ref())?;
    }
    if let Some(rest) = &obj.stx.rest {
      if !properties.is_empty() {
        self.out.write_str(", ")?;
      };
      self.out.write_str("...")?;
      self.out.write_str(&rest.stx.name)?;
    };
    self.out.write_char('}')
  }

  fn emit_jsx_name(&mut self, name: &Node<JsxName>) -> EmitResult {
    if let Some(namespace) = &name.stx.namespace {
      self.out.write_str(namespace)?;
      self.out.write_char(':')?;
    };
    self.out.write_str(&name.stx.name)
  }

  fn emit_jsx_elem_name(&mut self, name: &JsxElemName) -> EmitResult {
    match name {
      JsxElemName::Id(id) => self.out.write_str(&id.stx.name),
      JsxElemName::Name(name) => self.emit_jsx_name(name),
      JsxElemName::Member(member) => {
        self.out.write_str(&member.stx.base.stx.name)?;
        for part in member.stx.path.iter() {
          self.out.write_char('.')?;
          self.out.write_str(part)?;
        }
        Ok(())
      }
    }
  }

  fn emit_jsx_expr_container(&mut self, container: &Node<JsxExprContainer>) -> EmitResult {
    self.out.write_char('{')?;
    if let Some(value) = &container.stx.value {
      self.emit_expr_with_min_prec(value, ASSIGNMENT_PRECEDENCE)?;
    };
    self.out.write_char('}')
  }

  fn emit_jsx_elem(&mut self, elem: &Node<JsxElem>) -> EmitResult {
    self.out.write_char('<')?;
    if let Some(name) = &elem.stx.name {
      self.emit_jsx_elem_name(name)?;
    };
    for attr in elem.stx.attributes.iter() {
      self.out.write_char(' ')?;
      match attr {
        JsxAttr::Named { name, value } => {
          self.emit_jsx_name(name)?;
          match value {
            None => {}
            Some(JsxAttrVal::Text(text)) => {
              self.out.write_char('=')?;
              self.out.write_str(&text.stx.value)?;
            }
            Some(JsxAttrVal::Expression(container)) => {
              self.out.write_char('=')?;
              self.emit_jsx_expr_container(container)?;
            }
            Some(JsxAttrVal::Element(elem)) => {
              self.out.write_char('=')?;
              self.emit_jsx_elem(elem)?;
            }
          };
        }
        JsxAttr::Spread { value } => {
          self.out.write_str("{...")?;
          self.emit_expr_with_min_prec(&value.stx.value, ASSIGNMENT_PRECEDENCE)?;
          self.out.write_char('}')?;
        }
      };
    }
    if elem.stx.children.is_empty() && elem.stx.name.is_some() {
      return self.out.write_str(" />");
    };
    self.out.write_char('>')?;
    for child in elem.stx.children.iter() {
      match child {
        JsxElemChild::Text(text) => self.out.write_str(&text.stx.value)?,
        JsxElemChild::Expr(container) => self.emit_jsx_expr_container(container)?,
        JsxElemChild::Element(elem) => self.emit_jsx_elem(elem)?,
      };
    }
    self.out.write_str("</")?;
    if let Some(name) = &elem.stx.name {
      self.emit_jsx_elem_name(name)?;
    };
    self.out.write_char('>')
  }
}
