use anyhow::Result;

use LearnedBloom::classifier::{Classifier, DecisionTreeClassifier, FeatureVector};
use LearnedBloom::config::SandwichConfig;
use LearnedBloom::filter::SandwichedLearnedBloomFilter;

/// Oracle that accepts everything (zero false negatives, useless FPR).
struct AlwaysMember;
impl Classifier for AlwaysMember {
    fn predict(&self, _f: &FeatureVector) -> bool {
        true
    }
}

/// Oracle that rejects everything (every true-set key is a classifier
/// false negative, so all of them must land in L3).
struct NeverMember;
impl Classifier for NeverMember {
    fn predict(&self, _f: &FeatureVector) -> bool {
        false
    }
}

/// A key the classifier gets right is answered without L3: L3 stays empty
/// through insertion and the query still returns true.
#[test]
fn classifier_positive_key_skips_l3() -> Result<()> {
    let model = AlwaysMember;
    let mut sf = SandwichedLearnedBloomFilter::new(1000, 2, 500, 2, &model)?;

    sf.insert("http://bad-hacker-site-0-0000.com");
    assert_eq!(sf.l3().bits_set(), 0, "positive prediction must not touch L3");
    assert!(sf.query("http://bad-hacker-site-0-0000.com"));
    Ok(())
}

/// A key the classifier mis-routes to "absent" is caught by L3, and
/// skipping the conditional L3 insert (protocol violation) flips the
/// answer to a false negative.
#[test]
fn classifier_negative_key_needs_l3() -> Result<()> {
    let model = NeverMember;
    let key = "bad7.com";

    // correct protocol: insert() routes the key into L3
    let mut sf = SandwichedLearnedBloomFilter::new(1000, 2, 500, 2, &model)?;
    sf.insert(key);
    assert!(sf.l3().bits_set() > 0, "negative prediction must prime L3");
    assert!(sf.query(key), "L3 path must recover the classifier miss");

    // protocol violation: L1 only, no L3 backstop
    let mut broken = SandwichedLearnedBloomFilter::new(1000, 2, 500, 2, &model)?;
    broken.insert_l1(key);
    assert!(
        !broken.query(key),
        "without the conditional L3 insert the sandwich loses its guarantee"
    );
    Ok(())
}

/// Global invariant: every populated key queries true, whatever the
/// classifier thinks of it.
#[test]
fn no_false_negatives_for_any_oracle() -> Result<()> {
    let keys: Vec<String> = (0..5000)
        .map(|i| {
            if i % 3 == 0 {
                format!("http://bad-hacker-site-{i}-0042.com")
            } else {
                format!("short{i}")
            }
        })
        .collect();

    let tree = DecisionTreeClassifier;
    let yes = AlwaysMember;
    let no = NeverMember;
    let oracles: [&dyn Classifier; 3] = [&tree, &yes, &no];

    for model in oracles {
        let mut sf = SandwichedLearnedBloomFilter::new(1000, 2, 500, 2, model)?;
        sf.populate(&keys);
        for k in &keys {
            assert!(sf.query(k), "populated key answered absent: {k}");
        }
    }
    Ok(())
}

/// memory_bits() is the sum of both bread filters; the classifier is free.
#[test]
fn memory_accounting_sums_l1_l3() -> Result<()> {
    let model = DecisionTreeClassifier;
    let mut sf = SandwichedLearnedBloomFilter::new(1000, 2, 500, 2, &model)?;
    assert_eq!(sf.memory_bits(), 1500);
    sf.populate((0..100).map(|i| format!("k-{i}")));
    assert_eq!(sf.memory_bits(), 1500, "memory cost must not depend on load");
    Ok(())
}

/// Degenerate sizing is rejected at construction, for raw parameters and
/// through the config path alike.
#[test]
fn constructor_rejects_zero_params() {
    let model = DecisionTreeClassifier;
    assert!(SandwichedLearnedBloomFilter::new(0, 2, 500, 2, &model).is_err());
    assert!(SandwichedLearnedBloomFilter::new(1000, 2, 0, 2, &model).is_err());
    assert!(SandwichedLearnedBloomFilter::new(1000, 0, 500, 2, &model).is_err());

    let cfg = SandwichConfig::default().with_l3_hashes(0).build();
    assert!(SandwichedLearnedBloomFilter::with_config(&cfg, &model).is_err());
}

/// An L1 miss is definitive: no classifier call can resurrect a key that
/// was never inserted into L1.
#[test]
fn l1_miss_is_exact_negative() -> Result<()> {
    let model = AlwaysMember;
    let sf = SandwichedLearnedBloomFilter::new(4096, 3, 500, 2, &model)?;
    assert!(
        !sf.query("http://never-inserted-0.com"),
        "empty L1 must reject even when the classifier says member"
    );
    Ok(())
}
