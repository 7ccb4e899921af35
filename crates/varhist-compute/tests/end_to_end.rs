//! Full-cycle test: parse markup, flatten into the cache format, write and
//! reload the batch files, then compute variant sets against that cache.

use varhist_cache::{LoadMode, VariantCache, write_batches};
use varhist_compute::{ComputeRequest, RequestRecord, VariantsComputer, ingest, run_batch};
use varhist_markup::FormsList;
use varhist_markup::node::{Node, Tag};
use varhist_types::daterange::{DateRange, PROJECTED_END, UNKNOWN};
use varhist_types::wordclass::Wordclass;

fn wolf_markup() -> Node {
    Node::new(Tag::Section, "").with_children(vec![
        Node::new(Tag::Section, "").with_id("s1").with_children(vec![
            Node::new(Tag::Unit, "").with_children(vec![
                Node::new(Tag::Form, "wulf"),
                Node::new(Tag::Date, "OE-15"),
            ]),
            Node::new(Tag::Unit, "").with_children(vec![
                Node::new(Tag::Form, "wolf"),
                Node::new(Tag::Date, "15"),
            ]),
        ]),
    ])
}

#[test]
fn markup_to_cache_to_computed_variants() {
    let mut forms = FormsList::from_revised("wolf", &wolf_markup());
    let entry = ingest::cache_entry("wolf_nn01", 12, Wordclass::Noun, &mut forms);

    let dir = tempfile::tempdir().unwrap();
    write_batches(dir.path(), &[entry], 100).unwrap();
    let cache = VariantCache::load(dir.path(), LoadMode::Mmap).unwrap();
    assert_eq!(cache.entry_count(), 1);

    let computer = VariantsComputer::new(&cache);
    let mut request = ComputeRequest::new("wolf", DateRange::of(750, UNKNOWN));
    request.wordclass = Some(Wordclass::Noun);
    let variants = computer.compute(&request);

    assert_eq!(variants.len(), 2);
    assert_eq!(variants[0].form, "wolf", "modern spelling sorts first");
    assert_eq!(variants[0].date.projected_end(), PROJECTED_END);
    let wulf = variants.iter().find(|f| f.form == "wulf").expect("wulf");
    assert_eq!((wulf.date.start(), wulf.date.end()), (750, 1499));
    assert!(variants.iter().all(|f| !f.computed));
}

#[test]
fn batch_loop_mixes_cached_and_fallback_lemmas() {
    let mut forms = FormsList::from_revised("wolf", &wolf_markup());
    let entry = ingest::cache_entry("wolf_nn01", 12, Wordclass::Noun, &mut forms);
    let dir = tempfile::tempdir().unwrap();
    write_batches(dir.path(), &[entry], 100).unwrap();
    let cache = VariantCache::load(dir.path(), LoadMode::Owned).unwrap();

    let record = |lemma: &str| RequestRecord {
        id: None,
        lemma: lemma.to_string(),
        wordclass: None,
        start: 1500,
        end: 0,
        alternate: None,
        hints: Vec::new(),
    };
    let results = run_batch(&cache, &[record("wolf"), record("zyzzle")], 50);
    assert_eq!(results.len(), 2);

    // "wolf" is evidenced; "wulf" ends before the requested window.
    assert_eq!(results[0].variants.len(), 1);
    assert_eq!(results[0].variants[0].form, "wolf");

    // "zyzzle" has no evidence anywhere and falls back to itself.
    assert_eq!(results[1].variants.len(), 1);
    assert_eq!(results[1].variants[0].form, "zyzzle");
    assert_eq!(results[1].variants[0].start, 1500);
}
