//! Word count: tokenisation, ordering and the summing combiner.

use linereduce::testing::*;
use linereduce::*;

#[test]
fn test_word_count_corpus() -> anyhow::Result<()> {
    let out = run_lines(Job::new("wc", WordCount, Sum), word_corpus())?;
    assert_eq!(
        out.lines(),
        vec![
            "Cool\t1",
            "cat\t1",
            "cool\t1",
            "heads\t1",
            "hello\t2",
            "is\t1",
            "mat\t1",
            "on\t1",
            "prevail\t1",
            "sat\t1",
            "schoolhouse\t1",
            "the\t3",
            "uncool\t1",
            "world\t1",
        ]
    );
    Ok(())
}

#[test]
fn test_counts_add_up_to_token_count() -> anyhow::Result<()> {
    let tokens: usize = word_corpus().iter().map(|l| l.split_whitespace().count()).sum();
    let out = run_lines(Job::new("wc", WordCount, Sum), word_corpus())?;

    let total: usize = out
        .lines()
        .iter()
        .map(|l| l.rsplit('\t').next().unwrap().parse::<usize>().unwrap())
        .sum();
    assert_eq!(total, tokens);
    assert_eq!(out.report.metrics.emitted, tokens as u64);
    Ok(())
}

#[test]
fn test_combiner_does_not_change_output() -> anyhow::Result<()> {
    let plain = run_lines(Job::new("plain", WordCount, Sum), word_corpus())?;
    let combined = run_lines(
        Job::new("combined", WordCount, Sum).with_combiner(Sum),
        word_corpus(),
    )?;
    assert_same_output(&plain, &combined);
    Ok(())
}

#[test]
fn test_map_line_emits_one_per_token() -> anyhow::Result<()> {
    let pairs = map_line(&WordCount, &Line::new(0, 0, "a  b\ta"))?;
    assert_eq!(
        pairs,
        vec![
            KeyValue::new("a", 1i64),
            KeyValue::new("b", 1i64),
            KeyValue::new("a", 1i64),
        ]
    );
    Ok(())
}

#[test]
fn test_empty_input_commits_empty_output() -> anyhow::Result<()> {
    let out = run_lines(Job::new("wc", WordCount, Sum), Vec::<&str>::new())?;
    assert_eq!(out.text, "");
    assert_eq!(out.report.metrics.lines_read, 0);
    assert_eq!(out.report.metrics.groups, 0);
    Ok(())
}
