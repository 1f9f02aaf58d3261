//! Definition text and agent data shared by the integration tests.

use std::collections::BTreeMap;

use snmpmap::defs::{self, options::default_cut};
use snmpmap::{Mapping, Oid, Value, oid};

/// System, interfaces, one two-column table and a notification alias.
pub const DEFS: &str = "
# test tree
typedef IfStatus ENUM ( 1 up 2 down 3 testing )

(1 internet
  (2 mgmt
    (1 mib_2
      (1 system
        (1 sysDescr DisplayString op_system GET)
        (2 sysObjectID OID op_system GET)
        (3 sysUpTime TIMETICKS op_system GET)
        (4 sysContact DisplayString op_system GET SET)
        (5 sysName DisplayString op_system GET SET)
      )
      (2 interfaces
        (1 ifNumber INTEGER op_interfaces GET)
        (2 ifTable
          (1 ifEntry : INTEGER op_ifTable
            (1 ifIndex INTEGER GET)
            (2 ifDescr DisplayString GET)
            (7 ifAdminStatus IfStatus GET SET)
            (10 ifInOctets COUNTER GET)
          )
        )
      )
      (4 ip
        (22 ipNetToMediaTable
          (1 ipNetToMediaEntry : INTEGER IPADDRESS op_ipNetToMedia
            (2 ipNetToMediaPhysAddress PhysAddress GET SET)
          )
        )
      )
    )
  )
  (6 snmpV2
    (3 snmpModules
      (1 snmpMIB
        (1 snmpMIBObjects
          (5 snmpTraps
            (1 coldStart OID op_coldStart)
          )
        )
      )
    )
  )
)
";

/// [`DEFS`] loaded with the default cut.
pub fn mapping() -> Mapping {
    let mut mapping = Mapping::new();
    defs::load_str(&mut mapping, DEFS, "fixture.def", &default_cut()).expect("fixture definitions load");
    mapping
}

/// sysDescr.0 through sysName.0.
pub fn system_mib() -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::OctetString("Test SNMP Agent".into()));
    data.insert(
        oid!(1, 3, 6, 1, 2, 1, 1, 2, 0),
        Value::ObjectIdentifier(oid!(1, 3, 6, 1, 6, 3, 1, 1, 5, 1)),
    );
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(123456));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), Value::OctetString("admin@test.local".into()));
    data.insert(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::OctetString("test-agent".into()));
    data
}

/// ifNumber.0 and `count` rows of ifIndex, ifDescr and ifAdminStatus.
pub fn interface_table(count: u32) -> BTreeMap<Oid, Value> {
    let mut data = BTreeMap::new();
    data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(count as i32));
    for i in 1..=count {
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 1, i), Value::Integer(i as i32));
        data.insert(
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, i),
            Value::OctetString(format!("eth{}", i - 1).into()),
        );
        data.insert(oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 7, i), Value::Integer(1));
    }
    data
}
