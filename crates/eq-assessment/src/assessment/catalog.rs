use std::collections::HashMap;
use std::sync::OnceLock;

use super::domain::{Profession, SeniorityBand};

static SCENARIO_TABLE: OnceLock<HashMap<(Profession, SeniorityBand), &'static str>> =
    OnceLock::new();

/// Scenario text for a profession label and respondent age.
pub fn scenario_for(profession: &str, age: u32) -> &'static str {
    scenario_for_profession(Profession::from_label(profession), age)
}

pub fn scenario_for_profession(profession: Profession, age: u32) -> &'static str {
    let band = SeniorityBand::from_age(age);
    let table = scenario_table();
    table
        .get(&(profession, band))
        .or_else(|| table.get(&(profession, SeniorityBand::Junior)))
        .or_else(|| table.get(&(Profession::Other, SeniorityBand::Junior)))
        .copied()
        .unwrap_or_default()
}

fn scenario_table() -> &'static HashMap<(Profession, SeniorityBand), &'static str> {
    SCENARIO_TABLE.get_or_init(|| {
        use Profession::*;
        use SeniorityBand::*;

        const SCENARIOS: &[(Profession, SeniorityBand, &str)] = &[
            (
                ItProfessional,
                Junior,
                "You are working on a critical bug fix that is due today. A senior developer critiques your code publicly in a team meeting, calling it 'messy and inefficient'. You feel embarrassed and frustrated.",
            ),
            (
                ItProfessional,
                MidSenior,
                "You are leading a small team and one of your developers is consistently missing deadlines, affecting the project timeline. You need to address this without demotivating them.",
            ),
            (
                ItProfessional,
                Senior,
                "A critical production issue has caused downtime for a major client. Your team is stressed and blaming each other. Upper management is demanding immediate answers while you are trying to coordinate the fix.",
            ),
            (
                Healthcare,
                Junior,
                "A patient's family member is shouting at you because they feel the wait time is too long, even though you are understaffed and doing your best.",
            ),
            (
                Healthcare,
                MidSenior,
                "You notice a junior nurse making a medication error. You need to intervene immediately to ensure patient safety while handling the situation discreetly and educationally.",
            ),
            (
                Healthcare,
                Senior,
                "You have to deliver difficult news to a patient's family about a treatment failure. The family is in denial and accuses the medical team of incompetence.",
            ),
            (
                Teacher,
                Junior,
                "A parent accuses you of grading their child unfairly and demands a grade change, threatening to go to the principal if you don't comply.",
            ),
            (
                Teacher,
                MidSenior,
                "You are mentoring a new teacher who is struggling with classroom management. They seem defensive when you offer advice.",
            ),
            (
                Teacher,
                Senior,
                "You notice a conflict between two colleagues that is affecting the school atmosphere. One colleague is spreading rumors about the other.",
            ),
            (
                LawEnforcementSocialWork,
                Junior,
                "You arrive at a chaotic scene where two neighbors are shouting threats at each other. One is recording you with a phone, trying to provoke a reaction.",
            ),
            (
                LawEnforcementSocialWork,
                MidSenior,
                "You are managing a high-risk case involving a vulnerable family. A partner agency has failed to deliver promised support, endangering the client's safety, and you must address this professional failure.",
            ),
            (
                LawEnforcementSocialWork,
                Senior,
                "Public trust in your department has dropped due to a recent incident. You must lead a community town hall meeting where attendees are angry, vocal, and demanding immediate policy changes.",
            ),
            (
                BusinessManagement,
                Junior,
                "You present a new strategy idea in a meeting, but a senior manager dismisses it without discussion, making a sarcastic comment about your lack of experience.",
            ),
            (
                BusinessManagement,
                MidSenior,
                "Two of your top performers have a personal conflict that is disrupting the team's workflow. One threatens to resign if the other isn't moved to a different department.",
            ),
            (
                BusinessManagement,
                Senior,
                "The company is facing a financial downturn, and you must announce significant budget cuts and potential layoffs to your department while maintaining morale and productivity.",
            ),
            (
                CreativeMedia,
                Junior,
                "A client rejects your design work for the third time with vague feedback like 'make it pop', and your deadline is tomorrow. You are feeling burnt out and undervalued.",
            ),
            (
                CreativeMedia,
                MidSenior,
                "A key client is demanding changes that compromise the artistic integrity and ethical standards of a project. You need to push back firmly but diplomatically to save the account.",
            ),
            (
                CreativeMedia,
                Senior,
                "Your creative agency is merging with a larger corporate firm. Your team fears losing their creative freedom and unique culture. You must navigate this transition while advocating for their identity.",
            ),
            (
                Other,
                Junior,
                "You are working on a group project where one member is not contributing but expects full credit. The deadline is approaching fast.",
            ),
            (
                Other,
                MidSenior,
                "You are managing a project where resources have been suddenly cut. You need to renegotiate deliverables with stakeholders who are resistant to change.",
            ),
            (
                Other,
                Senior,
                "You are leading a project where key stakeholders have conflicting requirements and are refusing to compromise, stalling progress.",
            ),
        ];

        let mut map = HashMap::with_capacity(SCENARIOS.len());
        for (profession, band, text) in SCENARIOS {
            map.insert((*profession, *band), *text);
        }
        map
    })
}
