//! Print the tree html2pug writes from, after normalization.
//!
//! `cargo run --example dump_tree < page.html`, add `--raw` to skip the
//! minifier.

use html2pug::{ConvertOptions, Node, minify, parse};
use std::io::{self, Read};

fn main() {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input).unwrap();
    let raw = std::env::args().any(|a| a == "--raw");

    let opts = ConvertOptions::default();
    let mut fragment = match parse(&input, &opts.parser) {
        Ok(fragment) => fragment,
        Err(e) => {
            eprintln!("parse failed: {e}");
            std::process::exit(1);
        }
    };
    if !raw {
        minify::normalize(&mut fragment, &opts.minify);
    }

    fn print_node(node: &Node, depth: usize) {
        let indent = "  ".repeat(depth);
        match node {
            Node::Element(el) => {
                let attrs: Vec<_> = el
                    .attrs
                    .iter()
                    .map(|a| format!(" {}={:?}", a.name, a.value))
                    .collect();
                println!("{}<{}{}>", indent, el.name, attrs.concat());
                for child in &el.children {
                    print_node(child, depth + 1);
                }
                println!("{}</{}>", indent, el.name);
            }
            Node::Text(t) => println!("{}TEXT: {:?}", indent, t),
            Node::Comment(c) => println!("{}COMMENT: {:?}", indent, c),
        }
    }

    for node in &fragment.nodes {
        print_node(node, 0);
    }

    fn max_depth(node: &Node) -> usize {
        match node {
            Node::Element(el) => 1 + el.children.iter().map(max_depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    eprintln!(
        "\nNodes at root: {}, max depth: {}",
        fragment.nodes.len(),
        fragment.nodes.iter().map(max_depth).max().unwrap_or(0)
    );
}
