use super::build::registry_member;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::jsx::JsxElem;
use crate::ast::expr::jsx::JsxElemName;
use crate::ast::expr::jsx::JsxMemberExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::loc::Loc;
use crate::registry::REGISTRY_NAME;
use crate::symbol::BindingResolver;
use crate::symbol::Symbol;
use crate::token::TT;
use ahash::HashMap;
use derive_visitor::VisitorMut;

type ExprNode = Node<Expr>;
type JsxElemNode = Node<JsxElem>;
type ObjMemberNode = Node<ObjMember>;

fn registry_base(loc: Loc) -> Node<IdExpr> {
  Node::new(loc, IdExpr {
    name: REGISTRY_NAME.to_string(),
  })
}

/// Replaces every reference to a registered binding with a read through the registry.
///
/// Names in `export {a as b}` lists aren't identifier nodes, so re-exports keep pointing at the
/// original bindings. Only nodes present before the pass are visited, so the registration records
/// built afterwards keep their plain references.
#[derive(VisitorMut)]
#[visitor(ExprNode(enter), JsxElemNode(enter), ObjMemberNode(enter))]
pub struct ReferenceVisitor<'a> {
  resolver: &'a dyn BindingResolver,
  // Alias recorded when each declaration was registered, which is what the registry knows it by
  // even if the identifier has been renamed since.
  aliases: &'a HashMap<Symbol, String>,
  pub rewritten: usize,
}

impl<'a> ReferenceVisitor<'a> {
  pub fn new(resolver: &'a dyn BindingResolver, aliases: &'a HashMap<Symbol, String>) -> Self {
    ReferenceVisitor {
      resolver,
      aliases,
      rewritten: 0,
    }
  }

  fn alias_of(&self, id: &Node<IdExpr>) -> Option<&'a str> {
    let symbol = self.resolver.resolve(&id.stx.name, &id.assoc)?;
    self.aliases.get(&symbol).map(|a| a.as_str())
  }

  fn enter_expr_node(&mut self, node: &mut ExprNode) {
    let Expr::Id(id) = node.stx.as_ref() else {
      return;
    };
    let Some(alias) = self.alias_of(id) else {
      return;
    };
    let loc = id.loc;
    *node.stx = *registry_member(loc, alias).stx;
    self.rewritten += 1;
  }

  // `{foo}` becomes `{foo: $imports.foo}`.
  fn enter_obj_member_node(&mut self, node: &mut ObjMemberNode) {
    let ObjMemberType::Shorthand { id } = &node.stx.typ else {
      return;
    };
    let Some(alias) = self.alias_of(id) else {
      return;
    };
    let loc = id.loc;
    let key = ClassOrObjKey::Direct(Node::new(loc, ClassOrObjMemberDirectKey {
      key: id.stx.name.clone(),
      tt: TT::Ident,
    }));
    node.stx.typ = ObjMemberType::Valued {
      key,
      val: ClassOrObjVal::Prop(Some(registry_member(loc, alias))),
    };
    self.rewritten += 1;
  }

  // `<Foo>` becomes `<$imports.Foo>` and `<Foo.Bar>` becomes `<$imports.Foo.Bar>`.
  fn enter_jsx_elem_node(&mut self, node: &mut JsxElemNode) {
    let replacement = match &mut node.stx.name {
      Some(JsxElemName::Id(tag)) => {
        let Some(alias) = self.alias_of(tag) else {
          return;
        };
        Some(Node::new(tag.loc, JsxMemberExpr {
          base: registry_base(tag.loc),
          path: vec![alias.to_string()],
        }))
      }
      Some(JsxElemName::Member(member)) => {
        let Some(alias) = self.alias_of(&member.stx.base) else {
          return;
        };
        member.stx.base = registry_base(member.stx.base.loc);
        member.stx.path.insert(0, alias.to_string());
        None
      }
      _ => return,
    };
    if let Some(member) = replacement {
      node.stx.name = Some(JsxElemName::Member(member));
    };
    self.rewritten += 1;
  }
}
