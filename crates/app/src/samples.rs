use quiz_core::model::{Difficulty, QuestionDraft};

struct Sample {
    prompt: &'static str,
    options: [&'static str; 4],
    correct: usize,
    explanation: &'static str,
    category: &'static str,
    difficulty: Difficulty,
}

const SAMPLES: [Sample; 10] = [
    Sample {
        prompt: "Which country hosted the 2024 Summer Olympics?",
        options: ["Japan", "France", "United Kingdom", "Australia"],
        correct: 1,
        explanation: "France hosted the 2024 Summer Olympics in Paris from July 26 to August 11, 2024.",
        category: "Sports",
        difficulty: Difficulty::Easy,
    },
    Sample {
        prompt: "Who is the current Secretary-General of the United Nations?",
        options: ["Ban Ki-moon", "António Guterres", "Kofi Annan", "Boutros Boutros-Ghali"],
        correct: 1,
        explanation: "António Guterres has served as UN Secretary-General since January 1, 2017.",
        category: "Politics",
        difficulty: Difficulty::Medium,
    },
    Sample {
        prompt: "Which company was the first to reach a $3 trillion market capitalization?",
        options: ["Microsoft", "Apple", "Amazon", "Google"],
        correct: 1,
        explanation: "Apple first closed above a $3 trillion market cap in 2023.",
        category: "Business",
        difficulty: Difficulty::Hard,
    },
    Sample {
        prompt: "What is the name of the AI chatbot developed by OpenAI?",
        options: ["Bard", "Claude", "ChatGPT", "Copilot"],
        correct: 2,
        explanation: "ChatGPT is developed by OpenAI.",
        category: "Technology",
        difficulty: Difficulty::Easy,
    },
    Sample {
        prompt: "Which country elected Javier Milei as president in 2023?",
        options: ["Brazil", "Argentina", "Chile", "Uruguay"],
        correct: 1,
        explanation: "Argentina elected Javier Milei in 2023.",
        category: "Politics",
        difficulty: Difficulty::Medium,
    },
    Sample {
        prompt: "Which climate agreement were commitments reaffirmed under at COP28 in Dubai?",
        options: ["Kyoto Protocol", "Paris Agreement", "Montreal Protocol", "Copenhagen Accord"],
        correct: 1,
        explanation: "COP28 concluded the first global stocktake under the Paris Agreement.",
        category: "Environment",
        difficulty: Difficulty::Hard,
    },
    Sample {
        prompt: "Which mission landed near the Moon's south pole in 2023?",
        options: ["Artemis 1", "Chang'e 5", "Chandrayaan-3", "Luna 25"],
        correct: 2,
        explanation: "India's Chandrayaan-3 landed near the lunar south pole in August 2023.",
        category: "Science",
        difficulty: Difficulty::Medium,
    },
    Sample {
        prompt: "Which COVID-19 variant was nicknamed in late 2023?",
        options: ["Omicron", "Delta Plus", "Pirola", "Centaurus"],
        correct: 2,
        explanation: "BA.2.86, nicknamed Pirola, drew attention from health authorities in late 2023.",
        category: "Health",
        difficulty: Difficulty::Hard,
    },
    Sample {
        prompt: "Which social media platform was rebranded as 'X'?",
        options: ["Instagram", "TikTok", "Twitter", "LinkedIn"],
        correct: 2,
        explanation: "Twitter was rebranded as X in 2023.",
        category: "Technology",
        difficulty: Difficulty::Easy,
    },
    Sample {
        prompt: "Which country won the ICC Cricket World Cup 2023?",
        options: ["India", "Australia", "England", "New Zealand"],
        correct: 1,
        explanation: "Australia beat India in the final in Ahmedabad.",
        category: "Sports",
        difficulty: Difficulty::Medium,
    },
];

/// Starter question bank used by the `seed` command.
pub fn sample_questions() -> Vec<QuestionDraft> {
    SAMPLES
        .iter()
        .map(|s| QuestionDraft {
            prompt: s.prompt.to_string(),
            options: s.options.iter().map(|o| (*o).to_string()).collect(),
            correct_answer: s.correct,
            explanation: s.explanation.to_string(),
            category: s.category.to_string(),
            difficulty: s.difficulty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn samples_validate() {
        for draft in sample_questions() {
            assert!(draft.validate(fixed_now()).is_ok());
        }
    }
}
