mod triplet;
