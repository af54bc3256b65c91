use crate::matcher::Entry;

pub fn entries() -> Vec<Entry> {
    vec![
        Entry {
            keywords: &["contact", "phone", "call", "email", "office hours", "reach"],
            category: "contact",
            content: "You can reach your case team by phone during office hours, Monday through Friday, or by \
                      replying to any email from your case manager. Messages are returned within one business \
                      day.",
            table: None,
        },
        Entry {
            keywords: &["case manager", "paralegal", "who is handling my case", "my attorney"],
            category: "case_team",
            content: "Every client has a **case manager** who handles day-to-day questions and an attorney who \
                      oversees strategy and negotiations. Your case manager is the fastest way to get an \
                      update.",
            table: None,
        },
        Entry {
            keywords: &["status", "case status", "update", "how long will my case take", "timeline"],
            category: "case_status",
            content: "Most claims move through treatment, demand, and negotiation. Treatment length drives the \
                      **timeline** more than anything else, so many cases take several months to a year. Ask \
                      your case manager for a status update at any time.",
            table: None,
        },
        Entry {
            keywords: &["ardi", "who are you", "what can you do", "help"],
            category: "assistant",
            content: "I'm **Ardi**, the firm's assistant. I can explain insurance terms, the steps of a personal \
                      injury case, medical treatment, and how settlements work. For anything specific to your \
                      case, your case team is the best source.",
            table: None,
        },
    ]
}
