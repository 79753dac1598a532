use std::collections::{HashSet, VecDeque};

use markgraph::analysis::ReachabilityBuilder;
use markgraph::analysis::reachability::marking_graph;
use markgraph::graph::PlainMarkingGraph;
use markgraph::net::{FiringRule, Marking, Net, Place, Transition};

/// p1 -> t1 -> p2 -> t2 -> p1
fn two_cycle() -> Net {
    let mut net = Net::empty();
    let p1 = net.add_place(Place::new("p1", 1));
    let p2 = net.add_place(Place::new("p2", 0));
    let t1 = net.add_transition(Transition::new("t1"));
    let t2 = net.add_transition(Transition::new("t2"));
    net.set_input_weight(p1, t1, 1);
    net.set_output_weight(p2, t1, 1);
    net.set_input_weight(p2, t2, 1);
    net.set_output_weight(p1, t2, 1);
    net
}

/// Two processes sharing one lock.
fn mutex() -> Net {
    let mut net = Net::empty();
    let lock = net.add_place(Place::new("lock", 1));
    for i in 0..2 {
        let idle = net.add_place(Place::new(format!("idle{i}"), 1));
        let crit = net.add_place(Place::new(format!("crit{i}"), 0));
        let enter = net.add_transition(Transition::new(format!("enter{i}")));
        let leave = net.add_transition(Transition::new(format!("leave{i}")));
        net.set_input_weight(idle, enter, 1);
        net.set_input_weight(lock, enter, 1);
        net.set_output_weight(crit, enter, 1);
        net.set_input_weight(crit, leave, 1);
        net.set_output_weight(idle, leave, 1);
        net.set_output_weight(lock, leave, 1);
    }
    net
}

/// A producer filling a buffer of capacity 2, and a consumer draining it.
fn bounded_buffer() -> Net {
    let mut net = Net::empty();
    let buffer = net.add_place(Place::new_with_tokens_and_capacity("buffer", 0, 2));
    let produce = net.add_transition(Transition::new("produce"));
    let consume = net.add_transition(Transition::new("consume"));
    net.set_output_weight(buffer, produce, 1);
    net.set_input_weight(buffer, consume, 1);
    net
}

/// Reachable markings enumerated without the graph builder.
fn reachable_markings(net: &Net) -> HashSet<Marking> {
    let mut seen = HashSet::from([net.initial_marking()]);
    let mut queue = VecDeque::from([net.initial_marking()]);
    while let Some(marking) = queue.pop_front() {
        for t in net.transition_ids() {
            if let Ok(next) = net.fire(&marking, t) {
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
    }
    seen
}

/// Every enabled firing has its edge and every edge is a real firing.
fn assert_edges_match_firing_rule(net: &Net, graph: &PlainMarkingGraph) {
    for (id, node) in graph.iter() {
        for t in net.transition_ids() {
            match (net.fire(node.marking(), t), node.successors().get(t)) {
                (Ok(next), Some(target)) => assert_eq!(graph.marking(target), &next),
                (Err(_), None) => {}
                (fired, edge) => panic!("{id:?} {t:?}: firing {fired:?} but edge {edge:?}"),
            }
        }
    }
}

#[test]
fn bounded_cycle_is_a_two_cycle() {
    let net = two_cycle();
    let graph = ReachabilityBuilder::new(&net).build(net.initial_marking());

    assert_eq!(graph.count(), 2);
    let root = graph.root();
    let successors = graph.successors_of(root);
    assert_eq!(successors.len(), 1);
    let other = successors[0];
    assert_ne!(other, root);
    assert_eq!(graph.successors_of(other), vec![root]);
    assert_eq!(graph.marking(other), &Marking::from(vec![0, 1]));
}

#[test]
fn dead_initial_marking_has_a_single_node() {
    let net = two_cycle();
    let graph = ReachabilityBuilder::new(&net).build(Marking::from(vec![0, 0]));

    assert_eq!(graph.count(), 1);
    assert!(graph.root_node().successors().is_empty());
    for t in net.transition_ids() {
        assert_eq!(graph.root_node().successors().get(t), None);
    }
    assert_eq!(graph.dead_nodes(), vec![graph.root()]);
}

#[test]
fn mutex_never_lets_both_processes_in() {
    let net = mutex();
    let graph = marking_graph(&net);
    let crit0 = net.place_by_name("crit0").unwrap();
    let crit1 = net.place_by_name("crit1").unwrap();

    assert_eq!(graph.count(), 3);
    assert!(graph.dead_nodes().is_empty());
    assert!(
        graph
            .iter()
            .all(|(_, node)| node.marking().tokens(crit0) + node.marking().tokens(crit1) <= 1)
    );
}

#[test]
fn capacity_bounds_the_buffer() {
    let net = bounded_buffer();
    let graph = marking_graph(&net);

    assert_eq!(graph.count(), 3);
    assert_edges_match_firing_rule(&net, &graph);
}

#[test]
fn nodes_are_exactly_the_reachable_markings() {
    for net in [two_cycle(), mutex(), bounded_buffer()] {
        let graph = marking_graph(&net);
        let from_graph: HashSet<Marking> =
            graph.iter().map(|(_, node)| node.marking().clone()).collect();

        assert_eq!(from_graph.len(), graph.node_count());
        assert_eq!(from_graph, reachable_markings(&net));
        assert_edges_match_firing_rule(&net, &graph);
    }
}

#[test]
fn rebuilding_gives_the_same_graph_up_to_relabelling() {
    let net = mutex();
    let first = marking_graph(&net);
    let second = marking_graph(&net);

    assert_eq!(first.node_count(), second.node_count());
    assert_eq!(first.edge_count(), second.edge_count());
    for (_, node) in first.iter() {
        let twin = second.find(node.marking()).unwrap();
        for (t, target) in node.successors().iter() {
            let twin_target = second.node(twin).successors().get(t).unwrap();
            assert_eq!(first.marking(target), second.marking(twin_target));
        }
    }
}

#[test]
fn dot_output_names_transitions() {
    let net = two_cycle();
    let graph = marking_graph(&net);
    let dot = graph.dot(|t| net.transition_name(t));

    assert!(dot.contains("t1"));
    assert!(dot.contains("t2"));
}
