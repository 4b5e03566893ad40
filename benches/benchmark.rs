//! Performance benchmarks for fb-export.
//!
//! Run with: `cargo bench`
//!
//! Synthetic `security.htm` documents of increasing size, parsed and
//! extracted with the default security section configuration.

use std::fmt::Write as _;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fb_export::dom;
use fb_export::extract::extract_section;
use fb_export::options::default_sections;
use fb_export::{CsvFormat, Packet, PacketFormat};

fn security_html(entries: usize) -> String {
    let mut html = String::from(
        "<html><head><meta charset=\"utf-8\"><title>Security</title></head><body>\
         <div class=\"contents\"><h2>Security</h2>\
         <h3>Account Activity</h3><ul><li>Login</li><li>Logout</li></ul>\
         <h3>IP Addresses</h3><ul>",
    );
    for i in 0..entries {
        let _ = write!(html, "<li>10.0.{}.{}</li>", i / 256, i % 256);
    }
    html.push_str("</ul><h3>Recognized Machines</h3><ul>");
    for i in 0..entries {
        let _ = write!(
            html,
            "<li>Name: Device {i}<br>Created: 2018-01-01 10:00<br>Updated: 2018-02-01 11:00\
             <br>IP Address: 10.0.0.{}<br>Browser: Chrome<br>Cookie: c{i}</li>",
            i % 256
        );
    }
    html.push_str("</ul></div></body></html>");
    html
}

fn bench_extract_security(c: &mut Criterion) {
    let sections = default_sections();
    let security = &sections[0];

    let mut group = c.benchmark_group("extract_security");
    for entries in [10, 100, 1000] {
        let html = security_html(entries);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(entries), &html, |b, html| {
            b.iter(|| {
                let doc = dom::parse(black_box(html));
                extract_section(&doc, security)
            });
        });
    }
    group.finish();
}

fn bench_write_csv(c: &mut Criterion) {
    let sections = default_sections();
    let doc = dom::parse(&security_html(1000));
    let packets: Vec<Packet> = match extract_section(&doc, &sections[0]) {
        Ok(packets) => packets,
        Err(err) => panic!("synthetic security document failed to extract: {err}"),
    };

    c.bench_function("write_csv_1000", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            for packet in &packets {
                if let Err(err) = CsvFormat.write_packet(black_box(packet), &mut out) {
                    panic!("in-memory CSV write failed: {err}");
                }
            }
            out
        });
    });
}

criterion_group!(benches, bench_extract_security, bench_write_csv);
criterion_main!(benches);
