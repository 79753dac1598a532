use markgraph::analysis::predicate::predicate_marking_graph;
use markgraph::analysis::{ExplorationError, PredicateReachabilityBuilder};
use markgraph::net::{BindingFiringRule, TransitionId};
use markgraph::predicate::{Binding, Label, PredicateMarking, PredicateNet, PredicateTransition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Colour {
    Black,
    White,
}

fn swap(binding: &Binding<Colour>) -> Colour {
    match binding.get("x") {
        Some(Colour::Black) => Colour::White,
        _ => Colour::Black,
    }
}

/// Moves one token from p1 to p2, flipping its colour.
fn colour_swap() -> PredicateNet<Colour> {
    let mut net = PredicateNet::new(["p1", "p2"])
        .with_tokens("p1", [Colour::Black, Colour::Black, Colour::White]);
    net.add_transition(
        PredicateTransition::new("t1")
            .consume("p1", vec![Label::variable("x")])
            .produce("p2", vec![Label::function(swap)]),
    );
    net
}

/// Philosophers picking up both forks at once: the net cannot deadlock.
fn lock_free_philosophers(n: u32) -> PredicateNet<u32> {
    let right = move |b: &Binding<u32>| (b.get("x").copied().unwrap_or(0) + 1) % n;
    let mut net = PredicateNet::new(["think", "eat", "forks"])
        .with_tokens("think", 0..n)
        .with_tokens("forks", 0..n);
    net.add_transition(
        PredicateTransition::new("eat")
            .consume("think", vec![Label::variable("x")])
            .consume("forks", vec![Label::variable("x"), Label::function(right)])
            .produce("eat", vec![Label::variable("x")]),
    );
    net.add_transition(
        PredicateTransition::new("release")
            .consume("eat", vec![Label::variable("x")])
            .produce("think", vec![Label::variable("x")])
            .produce("forks", vec![Label::variable("x"), Label::function(right)]),
    );
    net
}

/// Philosophers taking the left fork, then the right one: all of them can end
/// up hungry, each holding one fork.
fn lockable_philosophers(n: u32) -> PredicateNet<u32> {
    let right = move |b: &Binding<u32>| (b.get("x").copied().unwrap_or(0) + 1) % n;
    let mut net = PredicateNet::new(["think", "hungry", "eat", "forks"])
        .with_tokens("think", 0..n)
        .with_tokens("forks", 0..n);
    net.add_transition(
        PredicateTransition::new("take_left")
            .consume("think", vec![Label::variable("x")])
            .consume("forks", vec![Label::variable("x")])
            .produce("hungry", vec![Label::variable("x")]),
    );
    net.add_transition(
        PredicateTransition::new("take_right")
            .consume("hungry", vec![Label::variable("x")])
            .consume("forks", vec![Label::function(right)])
            .produce("eat", vec![Label::variable("x")]),
    );
    net.add_transition(
        PredicateTransition::new("release")
            .consume("eat", vec![Label::variable("x")])
            .produce("think", vec![Label::variable("x")])
            .produce("forks", vec![Label::variable("x"), Label::function(right)]),
    );
    net
}

#[test]
fn growing_net_is_reported_unbounded() {
    let mut net = PredicateNet::new(["p"]).with_tokens("p", [Colour::Black]);
    net.add_transition(
        PredicateTransition::new("grow")
            .consume("p", vec![Label::variable("x")])
            .produce("p", vec![Label::variable("x"), Label::variable("x")]),
    );

    let result = PredicateReachabilityBuilder::new(&net).build(net.initial_marking());
    assert!(matches!(result, Err(ExplorationError::Unbounded { .. })));
}

#[test]
fn unboundedness_found_after_a_prefix_carries_the_whole_witness() {
    let mut net = PredicateNet::new(["start", "p"]).with_tokens("start", [0u8]);
    let boot = net.add_transition(
        PredicateTransition::new("boot")
            .consume("start", vec![Label::variable("x")])
            .produce("p", vec![Label::variable("x")]),
    );
    let grow = net.add_transition(
        PredicateTransition::new("grow")
            .consume("p", vec![Label::variable("x")])
            .produce("p", vec![Label::variable("x"), Label::constant(1)]),
    );

    let err = predicate_marking_graph(&net).unwrap_err();
    assert_eq!(err, ExplorationError::Unbounded { witness: vec![boot, grow] });
}

#[test]
fn colour_swap_reaches_every_split_of_the_tokens() {
    let net = colour_swap();
    let graph = predicate_marking_graph(&net).unwrap();
    let t1 = TransitionId::new(0);

    // p1 keeps 0..=2 black and 0..=1 white tokens.
    assert_eq!(graph.count(), 6);
    assert_eq!(graph.root_node().successors().get(t1).unwrap().len(), 2);

    let finished = PredicateMarking::new()
        .with_place("p1", [])
        .with_place("p2", [Colour::White, Colour::White, Colour::Black]);
    assert_eq!(graph.dead_nodes(), vec![graph.find(&finished).unwrap()]);
}

#[test]
fn edges_are_real_firings() {
    let net = colour_swap();
    let graph = predicate_marking_graph(&net).unwrap();

    for (_, node) in graph.iter() {
        for (t, bindings) in node.successors().iter() {
            assert_eq!(
                bindings.len(),
                net.fireable_bindings(t, node.marking()).len()
            );
            for (binding, target) in bindings.iter() {
                let fired = net.fire_with(t, node.marking(), binding).unwrap();
                assert_eq!(graph.marking(target), &fired);
            }
        }
    }
}

#[test]
fn dead_start_has_empty_successors_for_every_transition() {
    let net = colour_swap();
    let empty = PredicateMarking::new()
        .with_place("p1", [])
        .with_place("p2", []);
    let graph = PredicateReachabilityBuilder::new(&net).build(empty).unwrap();

    assert_eq!(graph.count(), 1);
    for t in net.transition_ids() {
        assert!(graph.root_node().successors().get(t).unwrap().is_empty());
    }
}

#[test]
fn lock_free_philosophers_never_deadlock() {
    for (n, expected) in [(2, 3), (3, 4), (5, 11)] {
        let net = lock_free_philosophers(n);
        let graph = predicate_marking_graph(&net).unwrap();

        assert_eq!(graph.count(), expected, "{n} philosophers");
        assert!(graph.dead_nodes().is_empty());
    }
}

#[test]
fn rebuilding_predicate_graph_is_stable() {
    let net = lock_free_philosophers(5);
    let first = predicate_marking_graph(&net).unwrap();
    let second = predicate_marking_graph(&net).unwrap();

    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.edge_count(), second.edge_count());
    for (_, node) in first.iter() {
        assert!(second.contains_marking(node.marking()));
    }
}

#[test]
fn lockable_philosophers_deadlock_when_everyone_is_hungry() {
    for (n, expected) in [(2, 6), (3, 14)] {
        let net = lockable_philosophers(n);
        let graph = predicate_marking_graph(&net).unwrap();

        let everyone_hungry = PredicateMarking::new()
            .with_place("think", [])
            .with_place("hungry", 0..n)
            .with_place("eat", [])
            .with_place("forks", []);
        let stuck = graph.find(&everyone_hungry).unwrap();

        assert_eq!(graph.count(), expected, "{n} philosophers");
        assert_eq!(graph.dead_nodes(), vec![stuck]);
        for t in net.transition_ids() {
            assert!(graph.node(stuck).successors().get(t).unwrap().is_empty());
        }
    }
}
