//! The illustrative program: a university directory exposed through web
//! services (`Udirectory`, `ProfInfo`, `WorksWith`) and views over it.

use crate::construct::{Atom, Program, Rule};
use crate::Result;

pub fn directory_program() -> Result<Program> {
    let ud = Atom::new("Udirectory", "X").edb(true);
    let pix = Atom::new("ProfInfo", "X,Y").edb(true);
    let piz = Atom::new("ProfInfo", "Z,Y").edb(true);
    let wwx = Atom::new("WorksWith", "X,Y").edb(true);
    let wwz = Atom::new("WorksWith", "Z,Y").edb(true);

    let t1 = Atom::new("T1", "X");
    let t1joe = Atom::new("T1", "X").with_constant(0, "Joe")?;
    let t2xy = Atom::new("T2", "X,Y");
    let t2xz = Atom::new("T2", "X,Z");
    let t2zy = Atom::new("T2", "Z,Y");
    let t3xy = Atom::new("T3", "X,Y");
    let t3xz = Atom::new("T3", "X,Z");
    let t3zy = Atom::new("T3", "Z,Y");
    let t3yz = Atom::new("T3", "Y,Z");
    let t3joey = Atom::new("T3", "X,Y").with_constant(0, "Joe")?;

    let qy = Atom::new("Q", "Y");
    let qz = Atom::new("Q", "Z");

    Ok(vec![
        Rule::fact(t1joe),
        Rule::new(t1.clone(), vec![ud]),
        Rule::new(t2xy.clone(), vec![t1.clone(), pix.clone()]),
        Rule::new(t2xy.clone(), vec![t2xz.clone(), pix.clone()]),
        Rule::new(t2xy, vec![t3xz.clone(), pix]),
        Rule::new(t2zy, vec![t3xz.clone(), piz]),
        Rule::new(t3xy.clone(), vec![t1, wwx.clone()]),
        Rule::new(t3xy.clone(), vec![t2xz, wwx.clone()]),
        Rule::new(t3xy, vec![t3xz.clone(), wwx]),
        Rule::new(t3zy, vec![t3xz, wwz]),
        Rule::new(qy.clone(), vec![t3joey]),
        Rule::new(qz, vec![qy, t3yz]),
    ]
    .into_iter()
    .collect())
}
