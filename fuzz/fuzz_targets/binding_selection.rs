#![no_main]

use ioc_abstractions::*;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

trait Tool: Send + Sync {
    fn id(&self) -> u8;
}

struct Hammer;
impl Tool for Hammer {
    fn id(&self) -> u8 {
        0
    }
}
impl Injectable for Hammer {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|| Hammer)]
    }
}

struct Saw;
impl Tool for Saw {
    fn id(&self) -> u8 {
        1
    }
}
impl Injectable for Saw {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|| Saw)]
    }
}

implements!(Hammer => dyn Tool);
implements!(Saw => dyn Tool);

struct Worker {
    tool: Arc<dyn Tool>,
}
impl Injectable for Worker {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|tool: Arc<dyn Tool>| Worker { tool })]
    }
}

struct Carpenter {
    tool: Arc<dyn Tool>,
}
impl Injectable for Carpenter {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|tool: Arc<dyn Tool>| Carpenter { tool })]
    }

    fn ancestors() -> Vec<TypeKey> {
        vec![TypeKey::of::<Worker>()]
    }
}

// Each byte registers one binding: bit 0 picks the tool, bits 1-2 the
// condition, bit 3 the scope. A byte with bit 7 set disposes the container.
fuzz_target!(|data: &[u8]| {
    let container = Container::new();
    // (tier, tool) of the current winner per requester
    let mut carpenter: Option<(u8, u8)> = None;
    let mut worker: Option<(u8, u8)> = None;
    let mut top_level: Option<u8> = None;
    let mut disposed = false;

    for &byte in data.iter().take(64) {
        if byte & 0x80 != 0 {
            container.dispose();
            disposed = true;
            continue;
        }

        let tool = byte & 1;
        let scope = if byte & 0b1000 != 0 { Scope::Singleton } else { Scope::Transient };
        let (when, tier) = match (byte >> 1) & 0b11 {
            0 => (None, 1),
            1 => (Some(When::injected_into::<Worker>()), 2),
            2 => (Some(When::injected_exactly_into::<Carpenter>()), 3),
            _ => (Some(When::injected_exactly_into::<Worker>()), 3),
        };

        let result = match (tool, when) {
            (0, None) => container.register_type_to::<dyn Tool, Hammer>(scope),
            (_, None) => container.register_type_to::<dyn Tool, Saw>(scope),
            (0, Some(w)) => container.register_type_to_when::<dyn Tool, Hammer>(w, scope),
            (_, Some(w)) => container.register_type_to_when::<dyn Tool, Saw>(w, scope),
        };
        if disposed {
            assert_eq!(result, Err(DiError::ContainerDisposed));
            continue;
        }
        assert!(result.is_ok());

        let site = (byte >> 1) & 0b11;
        if tier == 1 {
            top_level = Some(tool);
        }
        let applies_to_carpenter = site != 3;
        let applies_to_worker = site != 2;
        if applies_to_carpenter && carpenter.map_or(true, |(t, _)| tier >= t) {
            carpenter = Some((tier, tool));
        }
        if applies_to_worker && worker.map_or(true, |(t, _)| tier >= t) {
            worker = Some((tier, tool));
        }
    }

    if disposed {
        assert_eq!(container.get_instance::<Worker>().err(), Some(DiError::ContainerDisposed));
        return;
    }

    assert_eq!(container.resolve::<dyn Tool>().ok().map(|t| t.id()), top_level);
    assert_eq!(
        container.get_instance::<Carpenter>().ok().map(|c| c.tool.id()),
        carpenter.map(|(_, tool)| tool)
    );
    assert_eq!(
        container.get_instance::<Worker>().ok().map(|w| w.tool.id()),
        worker.map(|(_, tool)| tool)
    );
});
