use std::fs::File;
use std::io::{prelude::*, BufReader};

use criterion::{criterion_group, criterion_main, Criterion};
use noaho_rs::AhoCorasick;
use regex::RegexSet;

fn cracklib_words() -> Vec<String> {
    let f = File::open("/usr/share/dict/cracklib-small").expect("cracklib-small exists");
    BufReader::new(f).lines().map(|l| l.unwrap()).collect()
}

fn build_automaton(words: &[String]) -> AhoCorasick {
    let mut aho = AhoCorasick::new();
    for w in words {
        aho.add(w.as_bytes(), ()).unwrap();
    }
    aho.compile();
    aho
}

fn bench_policies(c: &mut Criterion) {
    let words = cracklib_words();
    let aho = build_automaton(&words);
    let haystack = "cafécafé café café".repeat(50);
    let haystack = haystack.as_bytes();

    let mut group = c.benchmark_group("match_policies");
    group.bench_function("findall_short", |b| {
        b.iter(|| aho.findall_short(haystack).unwrap().count())
    });
    group.bench_function("findall_long", |b| {
        b.iter(|| aho.findall_long(haystack).unwrap().count())
    });
    group.finish();
}

fn bench_against_regex(c: &mut Criterion) {
    let words: Vec<String> = cracklib_words().into_iter().take(2000).collect();
    let aho = build_automaton(&words);
    let set = RegexSet::new(words.iter().map(|w| regex::escape(w))).unwrap();
    let haystack = "cafécafé café café".repeat(50);
    let haystack_str: &str = &haystack;
    let haystack_bytes = haystack.as_bytes();

    let mut group = c.benchmark_group("vs_regex");
    group.bench_function("aho_findall_long", |b| {
        b.iter(|| aho.findall_long(haystack_bytes).unwrap().count())
    });
    group.bench_function("regex_set_matches", |b| {
        b.iter(|| set.matches(haystack_str).matched_any())
    });
    group.finish();
}

criterion_group!(benches, bench_policies, bench_against_regex);
criterion_main!(benches);
