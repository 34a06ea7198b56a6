use criterion::{black_box, criterion_group, criterion_main, Criterion};

use adornment::adorn::Engine;
use adornment::construct::{AdornedAtom, Atom, Program, Rule};
use adornment::demo::directory_program;

// P0(X,Y) :- E(X,Z), P1(Z,Y) ... P(n-1)(X,Y) :- E(X,Y), each also recursive in itself
fn chain_program(length: usize) -> Program {
    let mut program = Program::new();
    for i in 0..length {
        let head = Atom::new(&format!("P{}", i), "X,Y");
        let edge = Atom::new("E", "X,Z").edb(true);
        let next = if i + 1 < length {
            Atom::new(&format!("P{}", i + 1), "Z,Y")
        } else {
            Atom::new("E", "Z,Y").edb(true)
        };
        program.push(Rule::new(head.clone(), vec![edge.clone(), next]));
        program.push(Rule::new(head, vec![Atom::new(&format!("P{}", i), "X,Z"), edge]));
    }
    program
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let directory = directory_program().unwrap();
    let query = AdornedAtom::new(Atom::new("Q", "Y"), "f").unwrap();
    c.bench_function("directory Q:f", |b| {
        b.iter(|| Engine::new(&directory).adorn(black_box(&query)).unwrap())
    });

    for length in [10, 100] {
        let chain = chain_program(length);
        let query = AdornedAtom::new(Atom::new("P0", "X,Y"), "ff").unwrap();
        c.bench_function(&format!("chain {} P0:ff", length), |b| {
            b.iter(|| Engine::new(&chain).adorn(black_box(&query)).unwrap())
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
