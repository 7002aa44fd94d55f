//! Ordering guarantees: configurers run in pre-order, visitors in
//! post-order, siblings in lexical order, and repeated walks observe the
//! same sequences.

mod support;

use std::cell::RefCell;
use std::rc::Rc;

use buildfile::BuildFile;
use support::{create_tree, visit_rels, Spec};
use walk::{walk, ConfigureError, Configuration, Configurer, Mode};

struct RecordingConfigurer {
    rels: Rc<RefCell<Vec<String>>>,
}

impl Configurer for RecordingConfigurer {
    fn configure(
        &self,
        _config: &mut Configuration,
        rel: &str,
        _build_file: Option<&BuildFile>,
    ) -> Result<(), ConfigureError> {
        self.rels.borrow_mut().push(rel.to_string());
        Ok(())
    }
}

struct FailingConfigurer;

impl Configurer for FailingConfigurer {
    fn configure(
        &self,
        _config: &mut Configuration,
        rel: &str,
        _build_file: Option<&BuildFile>,
    ) -> Result<(), ConfigureError> {
        if rel == "a" {
            Err(ConfigureError::new("refusing directory 'a'"))
        } else {
            Ok(())
        }
    }
}

#[test]
fn configure_is_preorder_and_visit_is_postorder() {
    let temp = create_tree(&[Spec::Dir("a/b")]);

    let configured = Rc::new(RefCell::new(Vec::new()));
    let configurers: Vec<Box<dyn Configurer>> = vec![Box::new(RecordingConfigurer {
        rels: Rc::clone(&configured),
    })];

    let mut visited = Vec::new();
    walk(
        Configuration::new(temp.path()),
        &configurers,
        &[String::new()],
        Mode::VisitAllUpdateSubdirs,
        |entry| visited.push(entry.rel().to_string()),
    )
    .expect("walk");

    assert_eq!(*configured.borrow(), ["", "a", "a/b"]);
    assert_eq!(visited, ["a/b", "a", ""]);
}

#[test]
fn siblings_visit_in_lexical_order() {
    let temp = create_tree(&[
        Spec::Dir("c"),
        Spec::Dir("a/z"),
        Spec::Dir("a/y"),
        Spec::Dir("b"),
    ]);

    let rels = visit_rels(temp.path(), Mode::VisitAllUpdateSubdirs, &[""]);
    assert_eq!(rels, ["a/y", "a/z", "a", "b", "c", ""]);
}

#[test]
fn repeated_walks_are_identical() {
    let temp = create_tree(&[
        Spec::File("BUILD.bazel", "# gazelle:exclude *.tmp\n"),
        Spec::File("keep.go", ""),
        Spec::File("drop.tmp", ""),
        Spec::Dir("sub/inner"),
    ]);

    let record = || {
        let mut seen = Vec::new();
        walk(
            Configuration::new(temp.path()),
            &[],
            &[String::new()],
            Mode::VisitAllUpdateSubdirs,
            |entry| {
                seen.push((
                    entry.rel().to_string(),
                    entry.update(),
                    entry.subdirs().to_vec(),
                    entry.regular_files().to_vec(),
                    entry.generated_files().to_vec(),
                ));
            },
        )
        .expect("walk");
        seen
    };

    let first = record();
    let second = record();
    assert_eq!(first, second);
    assert_eq!(first.last().expect("root visit").3, ["BUILD.bazel", "keep.go"]);
}

#[test]
fn configurer_failure_aborts_the_walk() {
    let temp = create_tree(&[Spec::Dir("a/b"), Spec::Dir("c")]);

    let configurers: Vec<Box<dyn Configurer>> = vec![Box::new(FailingConfigurer)];
    let mut visited = Vec::new();
    let err = walk(
        Configuration::new(temp.path()),
        &configurers,
        &[String::new()],
        Mode::VisitAllUpdateSubdirs,
        |entry| visited.push(entry.rel().to_string()),
    )
    .expect_err("configurer error");

    assert!(matches!(err, walk::WalkError::Configure { ref rel, .. } if rel == "a"));
    // The failure happened during pre-order descent, before any visit.
    assert!(visited.is_empty());
}
