//! Integration tests for component order placement: where a new or moved
//! child's statements land relative to its siblings.

use formloom::model::{ComponentId, Creation, FormModel, Variable};
use formloom::place::{FormEditor, NewComponent};
use formloom::source::StatementKind;
use formloom::Catalog;
use pretty_assertions::assert_eq;

fn catalog(content: &str) -> Catalog {
    Catalog::from_str(content).expect("catalog should load")
}

fn panel_form() -> (FormModel, ComponentId) {
    let mut form = FormModel::new("Test");
    let root = form.set_root_this("javax.swing.JPanel");
    (form, root)
}

#[test]
fn default_children_append_after_existing_siblings() {
    let (mut form, root) = panel_form();
    let catalog = Catalog::default();
    let mut editor = FormEditor::new(&mut form, &catalog);
    editor
        .add_component(root, NewComponent::new("javax.swing.JButton"))
        .unwrap();
    editor
        .add_component(root, NewComponent::new("javax.swing.JLabel"))
        .unwrap();

    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JButton button = new JButton();
    add(button);
    JLabel label = new JLabel();
    add(label);
  }
}
"#
    );
}

#[test]
fn default_children_stay_before_last_ordered_siblings() {
    let (mut form, root) = panel_form();
    let catalog = catalog(
        r#"
        [[component]]
        type = "org.demo.StatusBar"
        order = "last"
        "#,
    );
    let mut editor = FormEditor::new(&mut form, &catalog);
    let status_bar = editor
        .add_component(root, NewComponent::new("org.demo.StatusBar"))
        .unwrap();
    let button = editor
        .add_component(root, NewComponent::new("javax.swing.JButton"))
        .unwrap();

    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JButton button = new JButton();
    add(button);
    StatusBar statusBar = new StatusBar();
    add(statusBar);
  }
}
"#
    );
    assert_eq!(form.children_of(root), &[button, status_bar]);
}

#[test]
fn first_ordered_children_open_the_container() {
    let (mut form, root) = panel_form();
    let catalog = catalog(
        r#"
        [[component]]
        type = "javax.swing.JMenuBar"
        order = "first"
        "#,
    );
    let mut editor = FormEditor::new(&mut form, &catalog);
    let button = editor
        .add_component(root, NewComponent::new("javax.swing.JButton"))
        .unwrap();
    let menu_bar = editor
        .add_component(
            root,
            NewComponent::new("javax.swing.JMenuBar").with_association("setJMenuBar(@)"),
        )
        .unwrap();

    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JMenuBar menuBar = new JMenuBar();
    setJMenuBar(menuBar);
    JButton button = new JButton();
    add(button);
  }
}
"#
    );
    assert_eq!(form.children_of(root), &[menu_bar, button]);
}

#[test]
fn before_sibling_children_precede_their_named_type() {
    let (mut form, root) = panel_form();
    let catalog = catalog(
        r#"
        [[component]]
        type = "org.demo.Toolbar"
        order = "beforeSibling org.demo.StatusBar"

        [[component]]
        type = "org.demo.StatusBar"
        order = "last"
        "#,
    );
    let mut editor = FormEditor::new(&mut form, &catalog);
    let button = editor
        .add_component(root, NewComponent::new("javax.swing.JButton"))
        .unwrap();
    let status_bar = editor
        .add_component(root, NewComponent::new("org.demo.StatusBar"))
        .unwrap();
    let toolbar = editor
        .add_component(root, NewComponent::new("org.demo.Toolbar"))
        .unwrap();

    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JButton button = new JButton();
    add(button);
    Toolbar toolbar = new Toolbar();
    add(toolbar);
    StatusBar statusBar = new StatusBar();
    add(statusBar);
  }
}
"#
    );
    assert_eq!(form.children_of(root), &[button, toolbar, status_bar]);
}

#[test]
fn before_sibling_without_match_appends_like_default() {
    let (mut form, root) = panel_form();
    let catalog = catalog(
        r#"
        [[component]]
        type = "org.demo.Toolbar"
        order = "beforeSibling org.demo.StatusBar"
        "#,
    );
    let mut editor = FormEditor::new(&mut form, &catalog);
    editor
        .add_component(root, NewComponent::new("javax.swing.JButton"))
        .unwrap();
    editor
        .add_component(root, NewComponent::new("org.demo.Toolbar"))
        .unwrap();

    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JButton button = new JButton();
    add(button);
    Toolbar toolbar = new Toolbar();
    add(toolbar);
  }
}
"#
    );
}

#[test]
fn moving_a_child_into_another_container_rewrites_the_attachment() {
    let (mut form, root) = panel_form();
    let catalog = Catalog::default();
    let mut editor = FormEditor::new(&mut form, &catalog);
    let panel = editor
        .add_component(root, NewComponent::new("javax.swing.JPanel"))
        .unwrap();
    let button = editor
        .add_component(root, NewComponent::new("javax.swing.JButton"))
        .unwrap();

    editor.move_component(button, panel).unwrap();

    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JPanel panel = new JPanel();
    add(panel);
    JButton button = new JButton();
    panel.add(button);
  }
}
"#
    );
    assert_eq!(form.children_of(root), &[panel]);
    assert_eq!(form.children_of(panel), &[button]);
}

#[test]
fn moving_before_a_last_ordered_sibling() {
    let (mut form, root) = panel_form();
    let catalog = catalog(
        r#"
        [[component]]
        type = "org.demo.StatusBar"
        order = "last"
        "#,
    );
    let mut editor = FormEditor::new(&mut form, &catalog);
    let panel = editor
        .add_component(root, NewComponent::new("javax.swing.JPanel"))
        .unwrap();
    let button = editor
        .add_component(panel, NewComponent::new("javax.swing.JButton"))
        .unwrap();
    let status_bar = editor
        .add_component(root, NewComponent::new("org.demo.StatusBar"))
        .unwrap();

    editor.move_component(button, root).unwrap();

    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JPanel panel = new JPanel();
    add(panel);
    JButton button = new JButton();
    add(button);
    StatusBar statusBar = new StatusBar();
    add(statusBar);
  }
}
"#
    );
    assert_eq!(form.children_of(root), &[panel, button, status_bar]);
    assert!(form.children_of(panel).is_empty());
}

#[test]
fn moving_takes_only_related_statements_out_of_shared_blocks() {
    let (mut form, root) = panel_form();
    let catalog = Catalog::default();
    let panel = {
        let mut editor = FormEditor::new(&mut form, &catalog);
        editor
            .add_component(root, NewComponent::new("javax.swing.JPanel"))
            .unwrap()
    };
    let body = {
        let ctor = form.constructor().unwrap();
        form.arena().method(ctor).body
    };
    let (_, block) = form.arena_mut().append_nested(body, None);
    let button = form.add_component(
        "javax.swing.JButton",
        Some(root),
        Variable::local("button"),
        "new JButton()",
    );
    form.append_creation(block, button);
    form.append_association(block, button, "add(@)", None);
    form.arena_mut().append(
        block,
        StatementKind::Raw {
            text: "int x = 0;".to_string(),
        },
    );

    let mut editor = FormEditor::new(&mut form, &catalog);
    editor.move_component(button, panel).unwrap();

    // the unrelated statement keeps the block alive where it was
    assert_eq!(
        form.render(),
        r#"public class Test extends JPanel {
  public Test() {
    JPanel panel = new JPanel();
    add(panel);
    JButton button = new JButton();
    panel.add(button);
    {
      int x = 0;
    }
  }
}
"#
    );
    assert_eq!(form.children_of(panel), &[button]);
}

#[test]
fn implicit_children_are_skipped_when_resolving_siblings() {
    let mut form = FormModel::new("Test");
    let frame = form.set_root_this("javax.swing.JFrame");
    let content = form.add_component(
        "javax.swing.JPanel",
        Some(frame),
        Variable::exposed("getContentPane"),
        "",
    );
    form.set_creation(content, Creation::Implicit);
    let catalog = catalog(
        r#"
        [[component]]
        type = "javax.swing.JMenuBar"
        order = "first"
        "#,
    );
    let mut editor = FormEditor::new(&mut form, &catalog);
    let menu_bar = editor
        .add_component(
            frame,
            NewComponent::new("javax.swing.JMenuBar").with_association("setJMenuBar(@)"),
        )
        .unwrap();

    // the content pane has no statements to slot in front of
    assert_eq!(
        form.render(),
        r#"public class Test extends JFrame {
  public Test() {
    JMenuBar menuBar = new JMenuBar();
    setJMenuBar(menuBar);
  }
}
"#
    );
    assert_eq!(form.children_of(frame), &[content, menu_bar]);
}
