//! `biotutor route` — show the lexical routing decision for a query.

use biotutor_context::has_contextual_reference;
use biotutor_router::lexical;

pub fn run(query: &str) {
    let response_type = lexical::classify(query);
    let decision = biotutor_core::RoutingDecision::for_type(response_type);

    println!("query:             {query}");
    println!("response type:     {}", decision.response_type);
    println!("retrieval target:  {:?}", decision.retrieval_target);
    println!(
        "contextual ref:    {}",
        if has_contextual_reference(query) {
            "yes"
        } else {
            "no"
        }
    );
}
