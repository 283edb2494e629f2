use std::io::{self, Write};

#[cfg(test)]
mod test;

const CONTEXT: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq)]
enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct OpCode {
    tag: Tag,
    a1: usize,
    a2: usize,
    b1: usize,
    b2: usize,
}

/// Writes a context-style diff of two token streams to `out` and reports
/// whether they matched. Identical streams produce no output.
pub fn compare(
    baseline: &[String],
    candidate: &[String],
    from_label: &str,
    to_label: &str,
    out: &mut dyn Write,
) -> io::Result<bool> {
    if baseline == candidate {
        return Ok(true);
    }
    writeln!(out, "*** {}", from_label)?;
    writeln!(out, "--- {}", to_label)?;
    for group in grouped(opcodes(baseline, candidate)) {
        writeln!(out, "***************")?;
        let first = group[0];
        let last = group[group.len() - 1];

        writeln!(out, "*** {} ****", format_range(first.a1, last.a2))?;
        if group.iter().any(|c| matches!(c.tag, Tag::Replace | Tag::Delete)) {
            for code in &group {
                let mark = match code.tag {
                    Tag::Equal => "  ",
                    Tag::Replace => "! ",
                    Tag::Delete => "- ",
                    Tag::Insert => continue,
                };
                for line in &baseline[code.a1..code.a2] {
                    writeln!(out, "{}{}", mark, line)?;
                }
            }
        }

        writeln!(out, "--- {} ----", format_range(first.b1, last.b2))?;
        if group.iter().any(|c| matches!(c.tag, Tag::Replace | Tag::Insert)) {
            for code in &group {
                let mark = match code.tag {
                    Tag::Equal => "  ",
                    Tag::Replace => "! ",
                    Tag::Insert => "+ ",
                    Tag::Delete => continue,
                };
                for line in &candidate[code.b1..code.b2] {
                    writeln!(out, "{}{}", mark, line)?;
                }
            }
        }
    }
    Ok(false)
}

fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    let beginning = if length == 0 { start } else { start + 1 };
    if length <= 1 {
        format!("{}", beginning)
    } else {
        format!("{},{}", beginning, beginning + length - 1)
    }
}

/// Longest-common-subsequence alignment, with the shared prefix and suffix
/// stripped first so near-identical streams stay cheap.
fn opcodes(a: &[String], b: &[String]) -> Vec<OpCode> {
    let n = a.len();
    let m = b.len();
    let mut pre = 0;
    while pre < n && pre < m && a[pre] == b[pre] {
        pre += 1;
    }
    let mut suf = 0;
    while suf < n - pre && suf < m - pre && a[n - 1 - suf] == b[m - 1 - suf] {
        suf += 1;
    }
    let ca = &a[pre..n - suf];
    let cb = &b[pre..m - suf];
    let rows = ca.len();
    let cols = cb.len();

    let mut lcs = vec![0u32; (rows + 1) * (cols + 1)];
    for i in (0..rows).rev() {
        for j in (0..cols).rev() {
            let idx = i * (cols + 1) + j;
            lcs[idx] = if ca[i] == cb[j] {
                lcs[idx + cols + 2] + 1
            } else {
                lcs[idx + cols + 1].max(lcs[idx + 1])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < rows && j < cols {
        if ca[i] == cb[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * (cols + 1) + j] >= lcs[i * (cols + 1) + j + 1]
        {
            i += 1;
        } else {
            j += 1;
        }
    }

    let mut codes = Vec::new();
    if pre > 0 {
        codes.push(OpCode {
            tag: Tag::Equal,
            a1: 0,
            a2: pre,
            b1: 0,
            b2: pre,
        });
    }
    let mut ai = 0;
    let mut bj = 0;
    let mut k = 0;
    while k < pairs.len() {
        let (pi, pj) = pairs[k];
        if pi > ai || pj > bj {
            codes.push(change(pre, ai, pi, bj, pj));
        }
        let mut run = 1;
        while k + run < pairs.len() && pairs[k + run] == (pi + run, pj + run)
        {
            run += 1;
        }
        codes.push(OpCode {
            tag: Tag::Equal,
            a1: pre + pi,
            a2: pre + pi + run,
            b1: pre + pj,
            b2: pre + pj + run,
        });
        ai = pi + run;
        bj = pj + run;
        k += run;
    }
    if ai < rows || bj < cols {
        codes.push(change(pre, ai, rows, bj, cols));
    }
    if suf > 0 {
        codes.push(OpCode {
            tag: Tag::Equal,
            a1: n - suf,
            a2: n,
            b1: m - suf,
            b2: m,
        });
    }
    codes
}

fn change(pre: usize, a1: usize, a2: usize, b1: usize, b2: usize) -> OpCode {
    let tag = if a1 == a2 {
        Tag::Insert
    } else if b1 == b2 {
        Tag::Delete
    } else {
        Tag::Replace
    };
    OpCode {
        tag,
        a1: pre + a1,
        a2: pre + a2,
        b1: pre + b1,
        b2: pre + b2,
    }
}

/// Splits opcodes into hunks with up to `CONTEXT` equal lines around each
/// change, dropping the interior of long equal stretches.
fn grouped(mut codes: Vec<OpCode>) -> Vec<Vec<OpCode>> {
    if let Some(first) = codes.first_mut() {
        if first.tag == Tag::Equal {
            first.a1 = first.a1.max(first.a2.saturating_sub(CONTEXT));
            first.b1 = first.b1.max(first.b2.saturating_sub(CONTEXT));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == Tag::Equal {
            last.a2 = last.a2.min(last.a1 + CONTEXT);
            last.b2 = last.b2.min(last.b1 + CONTEXT);
        }
    }
    let mut groups = Vec::new();
    let mut group: Vec<OpCode> = Vec::new();
    for code in codes {
        if code.tag == Tag::Equal
            && code.a2 - code.a1 > 2 * CONTEXT
            && !group.is_empty()
        {
            group.push(OpCode {
                a2: code.a1 + CONTEXT,
                b2: code.b1 + CONTEXT,
                ..code
            });
            groups.push(std::mem::take(&mut group));
            group.push(OpCode {
                a1: code.a2 - CONTEXT,
                b1: code.b2 - CONTEXT,
                ..code
            });
        } else {
            group.push(code);
        }
    }
    if !group.is_empty() && !(group.len() == 1 && group[0].tag == Tag::Equal)
    {
        groups.push(group);
    }
    groups
}
